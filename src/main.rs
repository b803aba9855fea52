use revalidate::config::Config;
use revalidate::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    tracing::info!(
        listen_addr = %cfg.listen_addr,
        root_dir = %cfg.root_dir.display(),
        "configuration loaded"
    );

    let handler = server::app::build(&cfg);

    tokio::select! {
        res = server::listener::run(&cfg, handler) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
