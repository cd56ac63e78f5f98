mod config;
mod controller;
mod display;
mod error;
mod focus;
mod loader;
mod panel;
mod snapshot;
mod store;
mod stream;
mod web;

use clap::Parser;
use log::info;

use config::{Cli, Command, SyncConfig};
use controller::ViewController;
use display::print_dashboard;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = SyncConfig::from_args(&cli.sync)?;
    info!(
        "Scheduler API at {}, push channel at {}, state in {}",
        config.api_url,
        config.websocket_url,
        config.state_dir.display()
    );

    let dashboard = ViewController::start(config);

    match cli.command.unwrap_or(Command::Watch) {
        Command::Web { port } => {
            println!("Serving the dashboard on http://localhost:{}", port);
            println!("  GET  /api/dashboard   POST /api/focus/{{id}}");
            println!("  GET  /api/snapshot    GET  /api/status    POST /api/reload");

            let result = web::start_server(port, dashboard.clone()).await;
            dashboard.shutdown().await;
            result?;
        }
        Command::Watch => {
            let mut updates = dashboard.subscribe();
            print_dashboard(&updates.borrow_and_update());
            loop {
                tokio::select! {
                    changed = updates.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        print_dashboard(&updates.borrow_and_update());
                    }
                    _ = tokio::signal::ctrl_c() => {
                        println!("\nShutting down...");
                        break;
                    }
                }
            }
            dashboard.shutdown().await;
        }
    }

    Ok(())
}
