use clap::{Parser, Subcommand};
use mock_server_client::{MockClient, RegisterMock};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "mockctl")]
#[command(about = "Management CLI for the HTTP mock server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a candidate response
    Register {
        method: String,
        path: String,
        /// Response body as JSON
        #[arg(short, long, default_value = "{}")]
        response: String,
        #[arg(short, long)]
        status: Option<u16>,
        #[arg(short, long)]
        description: Option<String>,
        /// Path parameter condition, as name=value (repeatable)
        #[arg(short, long = "when", value_parser = parse_condition)]
        conditions: Vec<(String, String)>,
    },
    /// List registered routes
    Routes,
    /// Delete one response by its createdAt id
    Delete {
        id: String,
        method: String,
        path: String,
    },
    /// Remove every registered route
    Flush,
    /// Check server health
    Health,
    /// Show system and mock routes
    Debug,
}

fn parse_condition(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = MockClient::new(&cli.url);

    let output = match cli.command {
        Commands::Register {
            method,
            path,
            response,
            status,
            description,
            conditions,
        } => {
            let body: Value = serde_json::from_str(&response)?;
            let mut mock = RegisterMock::new(&method, &path, body);
            if let Some(status) = status {
                mock = mock.status(status);
            }
            if let Some(description) = description {
                mock = mock.description(&description);
            }
            for (name, value) in conditions {
                mock = mock.when(&name, value);
            }
            let registered = client.register(&mock).await?;
            serde_json::json!({
                "message": registered.message,
                "route": registered.route,
                "createdAt": registered.created_at,
            })
        }
        Commands::Routes => {
            let routes = client.routes().await?;
            Value::Array(
                routes
                    .into_iter()
                    .map(|r| serde_json::json!({ "route": r.route, "responses": r.responses }))
                    .collect(),
            )
        }
        Commands::Delete { id, method, path } => client.delete_response(&id, &method, &path).await?,
        Commands::Flush => client.flush().await?,
        Commands::Health => client.health().await?,
        Commands::Debug => client.debug_routes().await?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
