mod simulate;
mod wallet_cmd;

use clap::{Parser, Subcommand};
use obscura_network::{Node, NodeConfig};
use simulate::SimulateArgs;
use wallet_cmd::WalletCommand;

#[derive(Parser)]
#[command(name = "obscura")]
#[command(about = "Obscura node, simulator, and wallet CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full node: listener + peer loop.
    Node {
        #[arg(long, default_value = "0.0.0.0")]
        bind_addr: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
        #[arg(long, value_delimiter = ',')]
        seed: Vec<String>,
    },
    /// Run the randomized chain-simulation driver.
    Simulate {
        #[arg(long, default_value_t = 50)]
        addresses: usize,
        #[arg(long, default_value_t = 200)]
        initial_utxos: usize,
        #[arg(long, default_value_t = 8)]
        ring_size: usize,
        /// Number of rounds to run; omit to run until interrupted.
        #[arg(long)]
        rounds: Option<u64>,
        #[arg(long, default_value_t = 2000)]
        interval_ms: u64,
    },
    /// Wallet operations (address-book only; no RPC client).
    Wallet {
        #[command(subcommand)]
        command: WalletCommand,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Node { bind_addr, port, seed } => {
            let config = NodeConfig::builder()
                .bind_addr(bind_addr)
                .port(port)
                .seed_peers(seed)
                .finish();
            let node = Node::new(config);
            if let Err(e) = node.run().await {
                tracing::error!(error = %e, "node exited with an error");
                std::process::exit(1);
            }
        }
        Commands::Simulate {
            addresses,
            initial_utxos,
            ring_size,
            rounds,
            interval_ms,
        } => {
            simulate::run(SimulateArgs {
                addresses,
                initial_utxos,
                ring_size,
                rounds,
                interval_ms,
            })
            .await;
        }
        Commands::Wallet { command } => wallet_cmd::run(command),
    }
}
