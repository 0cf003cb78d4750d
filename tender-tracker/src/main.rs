use tender_tracker::{settings::Settings, startup::App, telemetry::init_tracing};
use tracing::error;

#[tokio::main]
async fn main() {
    let settings = Settings::new().unwrap();
    init_tracing(settings.log_level);

    let app = App::build(settings).await.unwrap();

    if let Err(e) = app.run().await {
        error!("tender tracker exited with an error: {e:?}");
        std::process::exit(1);
    }
}
