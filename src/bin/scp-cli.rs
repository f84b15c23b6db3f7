use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "scp-cli")]
#[command(about = "Query a running ScPrime app API gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:14280")]
    url: String,

    /// Version path segment; the gateway accepts any value.
    #[arg(long, default_value = "v1")]
    api_version: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// SCP price, network data and USD exchange rates
    Data,
    /// Confirmed and pending transactions for addresses or public keys
    Transactions {
        #[arg(short, long = "address")]
        addresses: Vec<String>,

        #[arg(short, long = "public-key")]
        public_keys: Vec<String>,
    },
    /// Feed availability
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = format!("{}/{}", cli.url.trim_end_matches('/'), cli.api_version);

    let res = match cli.command {
        Commands::Data => client.get(format!("{base}/scprime/data")).send().await?,
        Commands::Transactions {
            addresses,
            public_keys,
        } => {
            client
                .post(format!("{base}/addresses/transactions/batch"))
                .json(&json!({ "addresses": addresses, "publickeys": public_keys }))
                .send()
                .await?
        }
        Commands::Health => {
            client
                .get(format!("{}/health", cli.url.trim_end_matches('/')))
                .send()
                .await?
        }
    };
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
