mod registrations;

pub use registrations::PgRegistrationStore;
