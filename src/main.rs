use logout_service::configuration::get_configuration;
use logout_service::startup::Application;
use logout_service::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("logout_service".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().expect("Failed to read configuration");

    let application = Application::build(configuration).await?;
    tracing::info!(port = application.port(), "Starting logout service");
    application.run_until_stopped().await?;

    Ok(())
}
