use anyhow::{Context, Result};
use clap::Parser;
use kadmin::credentials::{CredentialStore, FileStore, TOKEN_KEYS};
use kadmin::http::{ApiResponse, ClientConfig, ResponseBody, DEFAULT_TIMEOUT_MS};
use kadmin::session::invalidate_session;
use kadmin::ui::{LogNavigator, LogNotifier};
use std::path::PathBuf;
use std::sync::Arc;

/// kadmin - admin API probe
///
/// Issues requests against the admin API through the same credential
/// injection and failure handling the admin application uses.
///
/// Examples:
///   kadmin login --token abc123   # Store a token
///   kadmin get /api/students      # Authenticated GET
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API base address (also via KADMIN_BASE_URL)
    #[arg(
        long = "base-url",
        env = "KADMIN_BASE_URL",
        value_name = "URL",
        global = true,
        default_value = "http://localhost:3000"
    )]
    pub base_url: String,

    /// Credentials file (also via KADMIN_CREDENTIALS; defaults to the user
    /// config directory)
    #[arg(
        long = "credentials",
        env = "KADMIN_CREDENTIALS",
        value_name = "PATH",
        global = true
    )]
    pub credentials: Option<PathBuf>,

    /// Transport timeout in milliseconds
    #[arg(
        long = "timeout-ms",
        value_name = "MS",
        global = true,
        default_value_t = DEFAULT_TIMEOUT_MS
    )]
    pub timeout_ms: u64,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Issue a GET request
    Get(GetArgs),

    /// Issue a POST request with a JSON body
    Post(PostArgs),

    /// Store a token for subsequent requests
    Login(LoginArgs),

    /// Clear stored tokens
    Logout,
}

#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// Request path, e.g. /api/students
    #[arg(value_name = "PATH")]
    pub path: String,
}

#[derive(clap::Args, Debug)]
pub struct PostArgs {
    /// Request path, e.g. /api/students
    #[arg(value_name = "PATH")]
    pub path: String,

    /// JSON request body
    #[arg(long = "body", value_name = "JSON", default_value = "{}")]
    pub body: String,
}

#[derive(clap::Args, Debug)]
pub struct LoginArgs {
    /// Token value to store
    #[arg(long = "token", value_name = "TOKEN")]
    pub token: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let path = match cli.credentials {
        Some(path) => path,
        None => FileStore::default_path().context("Could not determine a credentials path")?,
    };
    let store = Arc::new(FileStore::new(path));

    match cli.command {
        Commands::Login(args) => {
            store.set(TOKEN_KEYS[0], &args.token)?;
            println!("Token stored");
        }
        Commands::Logout => {
            invalidate_session(store.as_ref(), &LogNavigator);
            println!("Session cleared");
        }
        Commands::Get(args) => {
            let client = ClientConfig::new(&cli.base_url)
                .with_timeout_ms(cli.timeout_ms)
                .build(store, Arc::new(LogNotifier), Arc::new(LogNavigator))?;
            print_response(client.get(&args.path).await?);
        }
        Commands::Post(args) => {
            let body = serde_json::from_str(&args.body).context("Invalid JSON body")?;
            let client = ClientConfig::new(&cli.base_url)
                .with_timeout_ms(cli.timeout_ms)
                .build(store, Arc::new(LogNotifier), Arc::new(LogNavigator))?;
            print_response(client.post(&args.path, body).await?);
        }
    }
    Ok(())
}

fn print_response(response: ApiResponse) {
    match response.body {
        ResponseBody::Text(text) => println!("{}", text),
        ResponseBody::Binary(bytes) => println!("{} bytes", bytes.len()),
    }
}
