pub mod payments;
pub mod registrations;
