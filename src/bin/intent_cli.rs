//! Intent CLI
//!
//! Operator tool for the intent service. Uses the same configuration and
//! store selection as the web server.
//!
//! ## Usage
//!
//! ```bash
//! KNOWLEDGE_SEED=config/knowledge_seed.yaml intent_cli normalize "Привет, как дела?"
//! KNOWLEDGE_SEED=config/knowledge_seed.yaml intent_cli intents
//! KNOWLEDGE_SEED=config/knowledge_seed.yaml intent_cli -o json resolve "где мой заказ"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use intent_service::{startup, AppConfig, StemLanguage, TextNormalizer};

#[derive(Parser)]
#[command(name = "intent_cli")]
#[command(version = "0.1.0")]
#[command(about = "Inspect normalization, the intent vocabulary and query resolution")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the normalized form of a text
    Normalize {
        text: String,

        /// Stemming language (defaults to STEM_LANGUAGE or russian)
        #[arg(long, short, env = "STEM_LANGUAGE")]
        language: Option<StemLanguage>,
    },

    /// List the intents known to the knowledge store
    Intents,

    /// Run the full resolution chain for a query
    Resolve { text: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intent_service=warn,intent_llm=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize { text, language } => {
            let normalizer = TextNormalizer::new(language.unwrap_or_default());
            let normalized = normalizer.normalize(&text);
            match cli.format {
                OutputFormat::Pretty => println!("{}", normalized),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({
                        "language": normalizer.language().as_str(),
                        "normalized": normalized,
                    })
                ),
            }
        }
        Commands::Intents => {
            let config = AppConfig::from_env().context("Invalid configuration")?;
            let normalizer = TextNormalizer::new(config.language);
            let store = startup::build_store(&config, &normalizer).await?;
            let intents = store
                .list_intents()
                .await
                .context("Failed to list intents")?;
            match cli.format {
                OutputFormat::Pretty => {
                    for intent in &intents {
                        println!("{}", intent);
                    }
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&intents)?),
            }
        }
        Commands::Resolve { text } => {
            let config = AppConfig::from_env().context("Invalid configuration")?;
            let resolver = startup::build_resolver(&config).await?;
            let query = resolver
                .resolve(&text)
                .await
                .with_context(|| format!("Failed to resolve '{}'", text))?;
            match cli.format {
                OutputFormat::Pretty => {
                    println!("intent:   {}", query.intent);
                    println!("stage:    {:?}", query.stage);
                    if query.has_response() {
                        println!("response: {}", query.response);
                    } else {
                        println!("response: (none stored)");
                    }
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&query)?),
            }
        }
    }

    Ok(())
}
