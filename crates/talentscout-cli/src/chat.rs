//! Interactive chat loop on stdin/stdout.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

use talentscout_core::Language;
use talentscout_runtime::ScreeningRuntime;

const CONVERSATION_ID: &str = "cli";

pub async fn run(
    runtime: &ScreeningRuntime,
    language: Language,
    transcript_path: Option<&Path>,
) -> Result<()> {
    let mut conversation = runtime
        .start(CONVERSATION_ID, language)
        .context("cannot start conversation")?;

    println!(
        "🤖 TalentScout Hiring Assistant ({}). Say hello to begin, type 'exit' to leave.",
        language.display_name()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("failed to write to stdout")?;

        let Some(line) = lines.next_line().await.context("failed to read from stdin")? else {
            break;
        };

        let response = runtime.handle_turn(&mut conversation, &line).await?;
        if !response.reply.is_empty() {
            println!("{}", response.reply);
        }

        if conversation.is_ended() {
            break;
        }
    }

    if let Some(path) = transcript_path {
        let json = serde_json::to_string_pretty(conversation.transcript())
            .context("failed to serialize transcript")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write transcript to {}", path.display()))?;
        tracing::info!(path = %path.display(), entries = conversation.transcript().len(), "Transcript saved");
    }

    Ok(())
}
