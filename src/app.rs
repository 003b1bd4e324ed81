use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::middleware::DefaultHeaders;
use actix_web::{get, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use tracing_actix_web::TracingLogger;

use crate::controller::{payments, registrations};
use crate::error::RestError;
use crate::flow::{PaymentGateway, RegistrationStore};

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("I am alive")
}

/// Permissive CORS headers on every response, pre-flights included.
/// The site is served from a different origin than this API.
fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "POST, OPTIONS"))
        .add(("Access-Control-Allow-Headers", "Content-Type, Authorization"))
}

/// Run the application on a specified TCP listener
pub fn run(
    listener: TcpListener,
    store: Arc<dyn RegistrationStore>,
    gateway: Arc<dyn PaymentGateway>,
) -> anyhow::Result<Server> {
    // Wrap application data
    let store = web::Data::from(store);
    let gateway = web::Data::from(gateway);

    // Malformed JSON bodies get the same {"error": ...} shape as every
    // other failure
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| RestError::BadRequest(err.to_string()).into());

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors_headers())
            .app_data(store.clone())
            .app_data(gateway.clone())
            .app_data(json_config.clone())
            .service(health_check)
            .service(registrations::create)
            .service(registrations::preflight)
            .service(payments::create_payment_intent)
            .service(payments::create_payment_intent_preflight)
            .service(payments::confirm_payment)
            .service(payments::confirm_payment_preflight)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
