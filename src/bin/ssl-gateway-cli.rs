use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "ssl-gateway-cli")]
#[command(about = "Command-line client for the Universal SSL gateway", long_about = None)]
struct Cli {
    /// Base URL of a running gateway.
    #[arg(short, long, default_value = "http://localhost:8787")]
    url: String,

    /// Cloudflare account email.
    #[arg(short, long, env = "CLOUDFLARE_EMAIL")]
    email: String,

    /// Global API Key or API token.
    #[arg(short = 'k', long, env = "CLOUDFLARE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// How to send the secret.
    #[arg(short, long, value_enum, default_value_t = Mode::Auto)]
    mode: Mode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the credentials against Cloudflare
    Test,
    /// Enable (or disable) Universal SSL on a zone
    Enable {
        /// Zone identifier
        #[arg(short, long)]
        zone_id: String,

        /// Certificate authority
        #[arg(long, value_enum, default_value_t = Ca::SslCom)]
        ca: Ca,

        /// Disable Universal SSL instead of enabling it
        #[arg(long)]
        disable: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Auto,
    Token,
    Key,
}

impl Mode {
    fn as_str(self) -> &'static str {
        match self {
            Mode::Auto => "auto",
            Mode::Token => "token",
            Mode::Key => "key",
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Ca {
    SslCom,
    LetsEncrypt,
    Digicert,
}

impl Ca {
    fn as_str(self) -> &'static str {
        match self {
            Ca::SslCom => "ssl_com",
            Ca::LetsEncrypt => "lets_encrypt",
            Ca::Digicert => "digicert",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let (path, body) = match cli.command {
        Commands::Test => (
            "api/test",
            json!({
                "email": cli.email,
                "apiKey": cli.api_key,
                "mode": cli.mode.as_str(),
            }),
        ),
        Commands::Enable { zone_id, ca, disable } => (
            "api/add-ssl",
            json!({
                "email": cli.email,
                "apiKey": cli.api_key,
                "mode": cli.mode.as_str(),
                "zoneId": zone_id,
                "enabled": !disable,
                "ca": ca.as_str(),
            }),
        ),
    };

    let res = client
        .post(format!("{}/{}", base, path))
        .json(&body)
        .send()
        .await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);

    if !status.is_success() || json.get("success") != Some(&Value::Bool(true)) {
        eprintln!("Error: gateway returned status {}", status);
        std::process::exit(1);
    }
    Ok(())
}
