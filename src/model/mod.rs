mod registrations;

pub use registrations::{NewRegistration, Registration, RegistrationDraft};
