use std::net::TcpListener;
use std::sync::Arc;

use anyhow::Context;

use sqlx::PgPool;

use hackathon_server::app;
use hackathon_server::flow::{PaymentGateway, RegistrationStore};
use hackathon_server::repo::PgRegistrationStore;
use hackathon_server::settings::Settings;
use hackathon_server::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = telemetry::create_subscriber("info".into(), std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let settings = Settings::load().context("Failed to load settings")?;

    let pool = PgPool::connect_with(settings.database.with_db()).await?;

    let store: Arc<dyn RegistrationStore> = Arc::new(PgRegistrationStore::new(pool));
    let gateway: Arc<dyn PaymentGateway> = Arc::new(settings.stripe.client()?);

    let listener = TcpListener::bind(settings.app.addr())?;

    app::run(listener, store, gateway)?
        .await
        .context("Failed to run app")
}
