//! proverb-board command line.
//!
//! # Architecture Overview
//!
//! ```text
//!   proverbs.toml ──▶ config ──┬──▶ RpcWalletProvider (alloy, optional local key)
//!                              │          │
//!                              │          ▼
//!                              ├──▶ ContractLedger (JSON ABI)
//!                              │          │
//!                              ▼          ▼
//!                        SessionController ──watch──▶ Renderer ──▶ stdout
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use proverb_board::blockchain::RpcWalletProvider;
use proverb_board::config::{load_config, AppConfig};
use proverb_board::ledger::ContractLedger;
use proverb_board::observability::logging;
use proverb_board::session::{SessionController, SessionPhase};
use proverb_board::ui::Renderer;

type Controller = SessionController<RpcWalletProvider, ContractLedger<RpcWalletProvider>>;

#[derive(Parser)]
#[command(name = "proverb-board")]
#[command(about = "Read and post proverbs on an Ethereum contract", long_about = None)]
struct Cli {
    /// Path to the TOML configuration.
    #[arg(short, long, default_value = "proverbs.toml")]
    config: PathBuf,

    /// Override the configured log level.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show account and network state without prompting the wallet
    Status,
    /// Connect and list every proverb
    List {
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Connect and post a proverb
    Post {
        /// The proverb text (clamped to the configured limit)
        message: String,
    },
    /// Line-oriented session: type a proverb to post it, or :connect, :refresh, :show, :quit
    Interactive,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    logging::init(
        cli.log_level
            .as_deref()
            .unwrap_or(&config.observability.log_level),
    );

    tracing::info!(
        chain_id = config.chain.chain_id,
        contract = %config.ledger.contract_address,
        "proverb-board v0.1.0 starting"
    );

    let controller = build_controller(&config)?;
    let renderer = Renderer::new(&config.chain.explorer_url, *controller.input());

    match cli.command {
        Commands::Status => {
            let _ = controller.check_existing_connection().await;
            let state = controller.snapshot();
            println!("{}", renderer.session(&state, Utc::now()));
            println!("Phase: {:?}", state.phase);
        }
        Commands::List { json } => {
            controller.connect().await?;
            let state = controller.snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(&state.entries)?);
            } else {
                print!("{}", renderer.entries(&state.entries, Utc::now()));
            }
        }
        Commands::Post { message } => {
            controller.connect().await?;
            let result = controller.submit_message(&message).await;
            println!("{}", renderer.session(&controller.snapshot(), Utc::now()));
            result?;
        }
        Commands::Interactive => interactive(&controller, &renderer).await?,
    }

    Ok(())
}

fn build_controller(config: &AppConfig) -> Result<Controller, Box<dyn std::error::Error>> {
    let provider = match RpcWalletProvider::from_env(config.chain.clone()) {
        Ok(provider) => Some(Arc::new(provider)),
        Err(e) => {
            tracing::error!(error = %e, "Wallet provider unavailable");
            None
        }
    };

    let ledger = match &provider {
        Some(provider) => ContractLedger::new(provider.clone(), &config.ledger)?,
        None => ContractLedger::unbound(&config.ledger)?,
    };

    Ok(SessionController::new(provider, ledger, config))
}

async fn interactive(controller: &Controller, renderer: &Renderer) -> std::io::Result<()> {
    let _ = controller.check_existing_connection().await;
    println!("{}", renderer.session(&controller.snapshot(), Utc::now()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            ":quit" | ":q" => break,
            ":connect" => {
                let _ = controller.connect().await;
            }
            ":refresh" => {
                let _ = controller.refresh().await;
            }
            ":show" => {}
            _ => {
                if controller.snapshot().phase == SessionPhase::Disconnected {
                    let _ = controller.connect().await;
                }
                let _ = controller.submit_message(&line).await;
            }
        }
        println!("{}", renderer.session(&controller.snapshot(), Utc::now()));
    }

    Ok(())
}
