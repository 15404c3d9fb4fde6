use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

use sol_transfer::blockchain::{
    BalanceReporter, Explorer, LedgerClient, RpcLedgerClient, TransferExecutor,
};
use sol_transfer::config::loader::{self, env_lookup, load_dotenv};
use sol_transfer::config::{AppConfig, Settings};
use sol_transfer::observability;
use sol_transfer::workflow::Driver;

#[derive(Parser)]
#[command(name = "sol-cli")]
#[command(about = "Operator CLI for SOL balances and transfers", long_about = None)]
struct Cli {
    /// Override RPC_SERVICE for this invocation
    #[arg(short, long)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the balance of an address
    Balance { address: String },
    /// Send SOL from the SENDER_SECRET_KEY wallet
    Send { recipient: String, amount: f64 },
    /// Show the latest blockhash and its validity window
    Blockhash,
    /// Check whether the RPC node reports healthy
    Health,
    /// Run the full workflow configured by the environment
    Run,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    load_dotenv();

    let lookup = |var: &str| {
        if var == loader::RPC_URL_ENV_VAR {
            if let Some(url) = &cli.url {
                return Some(url.clone());
            }
        }
        env_lookup(var)
    };

    let config = loader::load_app_config(&lookup)?;
    observability::init_logging(&config.observability);

    let rpc = RpcLedgerClient::new(&config.rpc)?;
    if let Commands::Health = cli.command {
        if rpc.is_healthy().await {
            println!("{}: healthy", config.rpc.url);
            return Ok(());
        }
        println!("{}: unhealthy", config.rpc.url);
        std::process::exit(1);
    }
    let client: Arc<dyn LedgerClient> = Arc::new(rpc);

    match cli.command {
        Commands::Balance { address } => {
            let reporter = BalanceReporter::new(client, config.rpc.commitment);
            let balance = reporter.balance(&address).await?;
            println!("{} SOL ({} lamports)", balance.sol, balance.lamports);
        }
        Commands::Send { recipient, amount } => {
            let wallet = loader::load_sender(&lookup)?;
            let receipt = executor(client, &config)
                .execute(&wallet, &recipient, amount)
                .await?;
            println!("Signature: {}", receipt.signature);
            println!("Explorer: {}", receipt.explorer_url);
        }
        Commands::Blockhash => {
            let reference = client.get_latest_blockhash(config.rpc.commitment).await?;
            println!("Blockhash: {}", reference.blockhash);
            println!("Last valid block height: {}", reference.last_valid_block_height);
        }
        Commands::Run => {
            let settings = Settings::from_lookup(lookup)?;
            let report = Driver::new(client, &settings).run().await;
            println!("Final state: {:?}", report.final_state());
            match report.signature() {
                Some(signature) => println!("Signature: {}", signature),
                None => println!("No confirmed transfer"),
            }
            println!("Failed steps: {}", report.failures());
        }
        Commands::Health => {}
    }

    Ok(())
}

fn executor(client: Arc<dyn LedgerClient>, config: &AppConfig) -> TransferExecutor {
    TransferExecutor::new(
        client,
        config.rpc.commitment,
        Duration::from_millis(config.confirmation.poll_interval_ms),
        Explorer::new(&config.explorer, &config.rpc.url),
    )
}
