use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "console-cli")]
#[command(about = "Management CLI for the auth site console", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080", env = "AUTH_SITE_URL")]
    url: String,

    /// Email sent as the signed-in caller.
    #[arg(short, long, env = "AUTH_SITE_EMAIL")]
    email: String,

    /// Header carrying the caller email.
    #[arg(long, default_value = "x-user-email")]
    user_header: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the admin session (phase, admin flag, save state)
    Status,
    /// Print the committed configuration document
    Show,
    /// Write the default configuration document
    Init,
    /// Replace one section from a JSON file and save
    Set {
        /// site, branding, theme or auth
        section: String,
        file: PathBuf,
    },
    /// Enter the console and merge a JSON patch into the preview
    Preview {
        section: String,
        /// Inline JSON object, e.g. '{"brandColor":"#FF0000"}'
        json: String,
    },
    /// Render the login view (preview when active)
    Login {
        /// Provider shown first
        #[arg(long)]
        primary: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_bytes(cli.user_header.as_bytes())?,
        HeaderValue::from_str(&cli.email)?,
    );

    match cli.command {
        Commands::Status => {
            let res = client
                .get(format!("{}/admin/session", base))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Show => {
            let res = client.get(format!("{}/config", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Init => {
            let res = client
                .post(format!("{}/admin/initialize", base))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Set { section, file } => {
            let body: Value = serde_json::from_str(&std::fs::read_to_string(file)?)?;
            let res = client
                .put(format!("{}/admin/config/{}", base, section))
                .headers(headers)
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Preview { section, json } => {
            let body: Value = serde_json::from_str(&json)?;
            let res = client
                .get(format!("{}/admin/session", base))
                .headers(headers.clone())
                .send()
                .await?;
            let session: Value = res.json().await?;
            if !session["previewActive"].as_bool().unwrap_or(false) {
                client
                    .post(format!("{}/admin/console/enter", base))
                    .headers(headers.clone())
                    .send()
                    .await?
                    .error_for_status()?;
            }
            let res = client
                .patch(format!("{}/admin/preview/{}", base, section))
                .headers(headers)
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Login { primary } => {
            let mut req = client.get(format!("{}/admin/preview/login", base)).headers(headers);
            if let Some(primary) = primary {
                req = req.query(&[("primary", primary)]);
            }
            print_response(req.send().await?).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: auth-site returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
