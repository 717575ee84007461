use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use url::Url;

#[derive(Parser)]
#[command(name = "blog-cli")]
#[command(about = "Command-line client for the blog proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the proxy is up
    Health,
    /// List all blogs
    List,
    /// Show one blog
    Get { id: String },
    /// Create a blog
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        author: String,
    },
    /// Change some fields of a blog
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        author: Option<String>,
    },
    /// Delete a blog
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = Url::parse(&cli.url)?;

    let res = match cli.command {
        Commands::Health => client.get(endpoint(&base, &[""])).send().await?,
        Commands::List => client.get(endpoint(&base, &["blogs"])).send().await?,
        Commands::Get { id } => {
            client
                .get(endpoint(&base, &["blogs", id.as_str()]))
                .send()
                .await?
        }
        Commands::Create {
            title,
            content,
            author,
        } => {
            let body = fields([
                ("title", Some(title)),
                ("content", Some(content)),
                ("author", Some(author)),
            ]);
            client.post(endpoint(&base, &["blogs"])).json(&body).send().await?
        }
        Commands::Update {
            id,
            title,
            content,
            author,
        } => {
            let body = fields([("title", title), ("content", content), ("author", author)]);
            client
                .put(endpoint(&base, &["blogs", id.as_str()]))
                .json(&body)
                .send()
                .await?
        }
        Commands::Delete { id } => {
            client
                .delete(endpoint(&base, &["blogs", id.as_str()]))
                .send()
                .await?
        }
    };

    print_response(res).await
}

/// `base` with `segments` appended; an id stays a single path segment.
fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Only the flags that were given end up in the body.
fn fields<const N: usize>(pairs: [(&str, Option<String>); N]) -> Value {
    let map: Map<String, Value> = pairs
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k.to_string(), Value::String(v))))
        .collect();
    Value::Object(map)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or(text);
        eprintln!("Error: proxy returned status {}: {}", status, message);
        std::process::exit(1);
    }

    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
