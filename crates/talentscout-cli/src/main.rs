use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use talentscout_core::{generate_questions, Language};
use talentscout_runtime::{ProviderRegistry, ScreeningRuntime};

mod chat;
mod settings;

use settings::Settings;

#[derive(Parser)]
#[command(name = "talentscout")]
#[command(about = "TalentScout hiring assistant - conversational candidate screening", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive screening conversation
    Chat {
        /// Display language: en, ta or hi
        #[arg(short, long, default_value = "en")]
        language: Language,

        /// YAML config file with screening and runtime sections
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the transcript as JSON when the conversation ends
        #[arg(short, long)]
        transcript: Option<PathBuf>,
    },

    /// Print the interview questions for a comma-separated tech stack
    Questions {
        /// e.g. "Python, Go"
        stack: String,
    },

    /// Validate a config file
    CheckConfig {
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("talentscout=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Chat {
            language,
            config,
            transcript,
        } => {
            let settings = match config {
                Some(path) => Settings::load(&path)?,
                None => Settings::default(),
            };
            let runtime = ScreeningRuntime::from_config(
                settings.runtime,
                settings.screening,
                &ProviderRegistry::with_defaults(),
            )
            .context("failed to build runtime")?;

            chat::run(&runtime, language, transcript.as_deref()).await?;
        }
        Commands::Questions { stack } => {
            for (i, question) in generate_questions(&stack).iter().enumerate() {
                println!("{}. {}", i + 1, question);
            }
        }
        Commands::CheckConfig { file } => {
            let settings = Settings::load(&file)?;
            if let Some(provider) = &settings.runtime.provider {
                ProviderRegistry::with_defaults()
                    .validate(&provider.provider_type, &provider.settings)
                    .with_context(|| format!("provider '{}' is misconfigured", provider.provider_type))?;
            }
            println!(
                "{} is valid (max {} points per question, {} per answer)",
                file.display(),
                settings.screening.max_points_per_question,
                settings.screening.points_per_answer
            );
        }
    }

    Ok(())
}
