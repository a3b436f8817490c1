use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wanderlust_agent_loop::AgentConfig;
use wanderlust_search::GooglePlacesClient;
use wanderlust_server::{router, AppState};
use wanderlust_store::Store;

#[derive(Debug, Parser)]
#[command(name = "wanderlust-server")]
struct Args {
    #[arg(long, env = "WANDERLUST_HTTP_ADDR", default_value = "127.0.0.1:3000")]
    http_addr: String,

    #[arg(long, env = "WANDERLUST_DB", default_value = "data/itinerary.db")]
    db: PathBuf,

    /// Model id passed to the LLM provider.
    #[arg(long, env = "WANDERLUST_MODEL", default_value = "gpt-4o-mini")]
    model: String,

    /// Override the assistant's system prompt.
    #[arg(long, env = "WANDERLUST_SYSTEM_PROMPT")]
    system_prompt: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let store = match Store::open(&args.db) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("failed to open database {}: {e}", args.db.display());
            std::process::exit(2);
        }
    };
    let search = Arc::new(GooglePlacesClient::from_env());

    let mut agent = AgentConfig::new(args.model);
    if let Some(prompt) = args.system_prompt {
        agent = agent.with_system_prompt(prompt);
    }

    let app = router(AppState::new(store, search, agent));

    let listener = match tokio::net::TcpListener::bind(&args.http_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("failed to bind {}: {e}", args.http_addr);
            std::process::exit(2);
        }
    };
    tracing::info!(addr = %args.http_addr, "wanderlust server listening");

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("server error: {e}");
        std::process::exit(1);
    }
}
