//! Local host for the action: `run key=value ...` for one invocation, `serve [addr]` for the action proxy.

use axum::Router;
use crud_action::{action_routes, common_routes, execute, ArgumentBag, AppState, Settings};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:8080";
const USAGE: &str = "usage: action-invoker run key=value ... | action-invoker serve [addr]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("crud_action=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::from_env()?;
    let state = AppState::new(settings)?;

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("run") => {
            let bag = ArgumentBag::from_pairs(args);
            let response = execute(&state, serde_json::Value::Object(bag.as_map().clone())).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Some("serve") => {
            let addr = args.next().unwrap_or_else(|| DEFAULT_ADDR.to_string());
            let app = Router::new().merge(common_routes()).merge(action_routes(state));
            let listener = TcpListener::bind(&addr).await?;
            tracing::info!("listening on {}", listener.local_addr()?);
            axum::serve(listener, app).await?;
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }
    Ok(())
}
