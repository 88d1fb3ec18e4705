use tracing_subscriber::{EnvFilter, fmt};

use rsvp_gala::config::Settings;
use rsvp_gala::shell;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let settings = Settings::from_env()?;
    let app = shell::app(&settings);

    tracing::info!("RSVP page: http://{}/rsvp/form", settings.bind_addr);
    tracing::info!("GraphQL endpoint: http://{}/gql", settings.bind_addr);
    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
