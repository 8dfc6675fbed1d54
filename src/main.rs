use anyhow::Context;
use dupsweep::configuration::get_config;
use dupsweep::startup::Application;
use dupsweep::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("dupsweep".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let config = get_config().context("Failed to read configuration")?;
    let application = Application::build(config).await?;
    tracing::info!(port = application.port(), "Cleanup service listening");
    application.run_until_stopped().await
}
