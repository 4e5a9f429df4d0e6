use newsletter_service::config::get_configuration;
use newsletter_service::startup::Application;
use newsletter_service::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber(String::from("newsletter_service"), String::from("info"));

    init_subscriber(subscriber);

    let config = get_configuration().expect("Missing configuration file.");

    tracing::info!("Server listening on {}", config.get_address());

    let application = Application::build(config).await?;

    application.run_until_stop().await?;

    Ok(())
}
