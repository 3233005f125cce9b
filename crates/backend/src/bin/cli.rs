use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared_types::{Credentials, ErrorResponse, ProtectedResponse, TokenResponse, UserResponse};

#[derive(Parser)]
#[command(name = "authgate-cli")]
#[command(about = "CLI for signing up, logging in, and reading the protected resource")]
#[command(
    long_about = "A command-line client for the authgate server.\n\n\
    Create an account with 'signup', exchange credentials for a bearer token\n\
    with 'login', then pass that token to 'protected'."
)]
struct Cli {
    /// Server URL to connect to.
    #[arg(
        short,
        long,
        default_value = "http://localhost:3042",
        env = "AUTHGATE_URL"
    )]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account
    Signup {
        /// Email address identifying the account.
        email: String,

        /// Password for the account.
        /// Prefer the AUTHGATE_PASSWORD env var so it stays out of shell history.
        #[arg(short, long, env = "AUTHGATE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log in and print a bearer token
    Login {
        /// Email address of an existing account.
        email: String,

        /// Password for the account.
        #[arg(short, long, env = "AUTHGATE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Fetch the protected resource with a bearer token
    Protected {
        /// Token printed by 'login'.
        #[arg(short, long, env = "AUTHGATE_TOKEN", hide_env_values = true)]
        token: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = Client::new();
    let base_url = cli.base_url.trim_end_matches('/');

    match cli.command {
        Commands::Signup { email, password } => {
            let response = client
                .post(format!("{}/signup", base_url))
                .json(&Credentials::new(email, password))
                .send()
                .await
                .context("Failed to reach server")?;
            let user: UserResponse = read_json(response).await?;
            println!("Created account [{}] {}", user.id, user.email);
        }
        Commands::Login { email, password } => {
            let response = client
                .post(format!("{}/login", base_url))
                .json(&Credentials::new(email, password))
                .send()
                .await
                .context("Failed to reach server")?;
            let body: TokenResponse = read_json(response).await?;
            println!("{}", body.token);
        }
        Commands::Protected { token } => {
            let response = client
                .get(format!("{}/protected", base_url))
                .bearer_auth(token)
                .send()
                .await
                .context("Failed to reach server")?;
            let body: ProtectedResponse = read_json(response).await?;
            println!("{}", body.data);
        }
    }

    Ok(())
}

/// Decode a success body, or turn the server's error message into an error.
async fn read_json<T: DeserializeOwned>(response: Response) -> anyhow::Result<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json()
            .await
            .context("Failed to parse server response");
    }

    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.message,
        Err(_) => "no error message".to_string(),
    };
    bail!("{} ({})", message, status)
}
