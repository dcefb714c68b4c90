#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cpm_core::{ServiceConfig, TaskStore, http_api, logging};

    let config = ServiceConfig::from_env()?;
    logging::init_logging(&config.log_filter);

    println!("cpm HTTP API listening on http://{}", config.http_addr);
    let state = http_api::AppState::new(TaskStore::new()).with_project_start(config.project_start);
    http_api::serve(config.http_addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
