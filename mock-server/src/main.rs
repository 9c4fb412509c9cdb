use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let upload_port = std::env::var("UPLOAD_PORT").unwrap_or_else(|_| "3001".to_string());

    let api = TcpListener::bind(format!("127.0.0.1:{port}")).await?;
    let upload = TcpListener::bind(format!("127.0.0.1:{upload_port}")).await?;
    tracing::info!(api = %api.local_addr()?, upload = %upload.local_addr()?, "listening");

    tokio::try_join!(mock_server::run(api), mock_server::run_upload(upload))?;
    Ok(())
}
