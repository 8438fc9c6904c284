use tally::{config, logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load()?;
    logging::registry_logs(config.logs.level)?;
    let config::ServerConfig { host, port } = config.server;
    let listener = server::bind(&host, port).await?;
    server::run_until_done(listener).await
}
