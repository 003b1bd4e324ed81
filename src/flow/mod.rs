mod ports;
mod state;
mod submission;

pub use ports::{PaymentGateway, RegistrationStore};
pub use state::{reduce, FormEvent, FormState, Phase};
pub use submission::{
    confirm_payment, premium_intent_request, to_minor_units, SubmissionFlow,
    PREMIUM_TIER_CURRENCY, PREMIUM_TIER_DESCRIPTION, PREMIUM_TIER_PRICE_USD,
};
