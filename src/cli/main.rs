use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::json;

#[derive(Parser)]
#[command(name = "catalog-search-cli")]
#[command(about = "Catalog search CLI", long_about = None)]
struct Cli {
    #[arg(short, long, env = "CATALOG_SEARCH_ENDPOINT", default_value = "http://127.0.0.1:8887")]
    endpoint: String,

    /// Bearer token for `static_tokens` servers
    #[arg(short, long, env = "CATALOG_SEARCH_TOKEN")]
    token: Option<String>,

    /// User id sent in the trusted header
    #[arg(short, long, env = "CATALOG_SEARCH_USER")]
    user: Option<String>,

    /// Header carrying the user id
    #[arg(long, default_value = "x-user-id")]
    user_header: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search {
        #[arg(value_name = "QUERY")]
        query: String,
    },

    /// Boost every tag of an item
    Boost {
        #[arg(value_name = "ITEM_NAME")]
        name: String,
    },

    /// Show the caller's tag preferences
    Preferences,

    /// Check server health
    Health,
}

impl Cli {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        match &self.user {
            Some(user) => request.header(self.user_header.as_str(), user.as_str()),
            None => request,
        }
    }
}

async fn print_response(response: Response) -> anyhow::Result<()> {
    let status = response.status();
    let body: serde_json::Value = response
        .json()
        .await
        .context("Server returned a non-JSON body")?;
    println!("{}", serde_json::to_string_pretty(&body)?);

    if !status.is_success() {
        bail!("Request failed with status {}", status);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = Client::new();

    let request = match &cli.command {
        Commands::Search { query } => cli.authorize(
            client
                .get(format!("{}/api/search", cli.endpoint))
                .query(&[("q", query)]),
        ),

        Commands::Boost { name } => cli.authorize(
            client
                .post(format!("{}/api/search/increment_tag", cli.endpoint))
                .json(&json!({ "name": name })),
        ),

        Commands::Preferences => {
            cli.authorize(client.get(format!("{}/api/search/preferences", cli.endpoint)))
        }

        Commands::Health => client.get(format!("{}/health", cli.endpoint)),
    };

    let response = request
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", cli.endpoint))?;
    print_response(response).await
}
