mod email_address;
mod experience_level;
mod participant_name;
mod payment_status;
mod registration_type;

pub use email_address::EmailAddress;
pub use experience_level::ExperienceLevel;
pub use participant_name::ParticipantName;
pub use payment_status::PaymentStatus;
pub use registration_type::RegistrationType;
