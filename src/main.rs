use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "homesol-api", about = "HomeSol field-sales backend API")]
struct Cli {
    /// Port to listen on (falls back to HOMESOL_API_PORT / PORT, then 3000)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("homesol_api=info,tower_http=info")
            }),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = homesol_api::config::config();
    tracing::info!("Starting HomeSol API in {:?} mode", config.environment);

    let cli = Cli::parse();
    let app = homesol_api::app();

    // Allow tests or deployments to override port via flag or env
    let port = cli
        .port
        .or_else(|| {
            std::env::var("HOMESOL_API_PORT")
                .ok()
                .or_else(|| std::env::var("PORT").ok())
                .and_then(|s| s.parse::<u16>().ok())
        })
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("HomeSol API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
