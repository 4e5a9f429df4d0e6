use once_cell::sync::Lazy;
use reqwest::Response;
use std::collections::HashMap;

use newsletter_service::{
    config::get_configuration,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};

// Initialized at most once for the whole test binary. Set TEST_LOG to see
// the bunyan output of the application under test.
static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(String::from("test"), String::from("debug"));
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
}

impl TestApp {
    pub async fn spawn_app() -> TestApp {
        Lazy::force(&TRACING);

        let mut config = get_configuration().expect("Missing configuration file.");

        // We are using port 0 as way to define a different port per each test. Port 0 is a special case that operating systems
        // take into account: when port is 0, the OS will search for the first available port
        config.set_app_port(0);
        // Every test gets its own volatile store, so tests never share state.
        config.set_use_document_store(false);

        let application = Application::build(config)
            .await
            .expect("Failed to build application.");

        let address = format!("http://127.0.0.1:{}", application.get_port());

        tokio::spawn(application.run_until_stop());

        TestApp { address }
    }

    pub async fn post_subscription(&self, body: HashMap<&str, &str>) -> Response {
        let client = reqwest::Client::new();
        let url = format!("{}/subscriptions", self.address);

        client
            .post(&url)
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_subscriptions(&self) -> Response {
        let client = reqwest::Client::new();
        let url = format!("{}/subscriptions", self.address);

        client
            .get(&url)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
