use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::handler::SharedHandler;

pub async fn run(cfg: &Config, handler: SharedHandler) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    serve(listener, handler).await
}

/// Accepts connections forever, one task per connection.
pub async fn serve(listener: TcpListener, handler: SharedHandler) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        tracing::debug!(%peer, "accepted connection");

        let handler = SharedHandler::clone(&handler);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, handler);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
