mod stripe;

pub use stripe::{CreatePaymentIntent, PaymentIntent, StripeClient};
