//! Command-line client for the portal HTTP API.

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "portal-cli")]
#[command(about = "Command-line client for the ether-portal API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the portal can reach its chain endpoint
    Health,
    /// Show network statistics
    Stats,
    /// List node-managed accounts with balances
    Accounts,
    /// Create and fund a new account (prints its private key once)
    NewAccount,
    /// Credit an address from the funding account
    Register {
        address: String,
        /// Ether to credit; the portal default applies when omitted
        #[arg(long)]
        amount: Option<String>,
    },
    /// Show balance, nonce and contract status of an address
    Login { address: String },
    /// Send ether from the holder of a private key
    Transfer {
        #[arg(long)]
        private_key: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: String,
    },
    /// Show a block by number, or latest/earliest/pending
    Block {
        #[arg(default_value = "latest")]
        selector: String,
    },
    /// Show a transaction by hash
    Tx { hash: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Health => client.get(format!("{}/health", base)),
        Commands::Stats => client.get(format!("{}/stats", base)),
        Commands::Accounts => client.get(format!("{}/accounts", base)),
        Commands::NewAccount => client.post(format!("{}/accounts", base)),
        Commands::Register { address, amount } => {
            let mut body = json!({ "address": address });
            if let Some(amount) = amount {
                body["amount_ether"] = Value::String(amount);
            }
            client.post(format!("{}/register", base)).json(&body)
        }
        Commands::Login { address } => client
            .post(format!("{}/login", base))
            .json(&json!({ "address": address })),
        Commands::Transfer {
            private_key,
            to,
            amount,
        } => client.post(format!("{}/transfer", base)).json(&json!({
            "private_key": private_key,
            "to": to,
            "amount_ether": amount,
        })),
        Commands::Block { selector } => client.get(format!("{}/blocks/{}", base, selector)),
        Commands::Tx { hash } => client.get(format!("{}/transactions/{}", base, hash)),
    };

    let succeeded = print_response(request.send().await?).await?;
    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

/// Pretty-print the response envelope; returns whether the call succeeded.
async fn print_response(res: reqwest::Response) -> Result<bool, Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => {
            let succeeded = json.get("success").and_then(Value::as_bool).unwrap_or(false);
            let rendered = serde_json::to_string_pretty(&json)?;
            if succeeded {
                println!("{}", rendered);
            } else {
                eprintln!("{}", rendered);
            }
            Ok(succeeded)
        }
        Err(_) => {
            eprintln!("Error: portal returned status {}", status);
            if !text.is_empty() {
                eprintln!("Response: {}", text);
            }
            Ok(false)
        }
    }
}
