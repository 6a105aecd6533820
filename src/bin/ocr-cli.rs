use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "ocr-cli")]
#[command(about = "Command-line client for the OCR Gateway", long_about = None)]
struct Cli {
    #[arg(short, long, env = "OCR_GATEWAY_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show service status and info
    Info,
    /// Check gateway health
    Health,
    /// Upload an image for OCR
    Submit {
        file: PathBuf,
        /// Declared content type, e.g. image/png
        #[arg(long)]
        mime: Option<String>,
        /// Multipart field name
        #[arg(long, default_value = "image")]
        field: String,
    },
    /// View recent OCR logs
    Logs {
        #[arg(short, long)]
        limit: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Info => {
            let res = client.get(format!("{}/", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Submit { file, mime, field } => {
            let bytes = tokio::fs::read(&file).await?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string());

            let mut part = Part::bytes(bytes).file_name(name);
            if let Some(mime) = mime {
                part = part.mime_str(&mime)?;
            }

            let res = client
                .post(format!("{}/ocr", base))
                .multipart(Form::new().part(field, part))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Logs { limit } => {
            let mut req = client.get(format!("{}/logs", base));
            if let Some(limit) = limit {
                req = req.query(&[("limit", limit)]);
            }
            print_response(req.send().await?).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        eprintln!("Response: {}", text);
        return Ok(());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
