//! Interactive terminal front-end for the Slidecraft assistant.

use anyhow::Context;
use clap::Parser;
use log::debug;
use slidecraft_config::AssistantConfig;
use slidecraft_core::Assistant;
use slidecraft_protocol::Attachment;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Command-line options for the interactive client.
#[derive(Parser)]
#[command(name = "slidecraft", version)]
struct Cli {
    /// Optional path to a slidecraft.json5 config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the configured model identifier
    #[arg(long)]
    model: Option<String>,
    /// Override the configured output root directory
    #[arg(long)]
    output_root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    slidecraft::init_logging();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AssistantConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AssistantConfig::from_env().context("failed to load config from environment")?,
    };
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(output_root) = cli.output_root {
        config.output_root = output_root;
    }
    debug!("starting with model {}", config.model);

    let assistant = Assistant::new(&config);
    let session = assistant.create_session();

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(
            b"Slidecraft ready. Type a message, /attach <path> to queue a file, /quit to exit.\n",
        )
        .await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Vec<Attachment> = Vec::new();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" {
            break;
        }
        if let Some(path) = line.strip_prefix("/attach ") {
            let attachment = Attachment::from_path(path.trim());
            stdout
                .write_all(format!("queued attachment: {}\n", attachment.name).as_bytes())
                .await?;
            pending.push(attachment);
            continue;
        }

        let attachments = std::mem::take(&mut pending);
        let reply = assistant
            .handle_turn(session, line, attachments)
            .await
            .context("turn failed")?;
        stdout.write_all(reply.text.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        for file in &reply.attachments {
            stdout
                .write_all(format!("generated file: {}\n", file.path.display()).as_bytes())
                .await?;
        }
    }

    assistant.delete_session(session);
    Ok(())
}
