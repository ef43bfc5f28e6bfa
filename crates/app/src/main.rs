mod server;

use clap::{Parser, Subcommand};
use chrono::Utc;
use doc_assist_core::{
    AnalysisOptions, AssistPipeline, Document, DocumentTextExtractor, FileSessionStore,
    InferenceClient, InferenceConfig, DEFAULT_ANSWER_MODEL, DEFAULT_SUMMARY_MODEL,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter, prelude::*};

#[derive(Parser)]
#[command(name = "doc-assist", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Text-inference service base URL
    #[arg(long, env = "INFERENCE_URL", default_value = "http://localhost:8090")]
    inference_url: String,

    /// Optional bearer token for the inference service
    #[arg(long, env = "INFERENCE_API_KEY")]
    inference_api_key: Option<String>,

    /// Model used to condense document chunks
    #[arg(long, env = "SUMMARY_MODEL", default_value = DEFAULT_SUMMARY_MODEL)]
    summary_model: String,

    /// Model used for extractive question answering
    #[arg(long, env = "ANSWER_MODEL", default_value = DEFAULT_ANSWER_MODEL)]
    answer_model: String,

    /// Deadline for a single inference call, in seconds
    #[arg(long, env = "INFERENCE_TIMEOUT_SECS", default_value = "60")]
    inference_timeout_secs: u64,

    /// Directory that stores one text blob per session
    #[arg(long, env = "SESSIONS_DIR", default_value = "sessions")]
    sessions_dir: String,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a document, summarize it, and open a question session.
    Analyze {
        /// Path to a pdf, png, jpg, or jpeg file.
        #[arg(long)]
        file: String,
    },
    /// Answer a question from a stored session's text.
    Ask {
        /// Session id returned by analyze.
        #[arg(long)]
        session: String,
        /// Question to answer.
        #[arg(long)]
        question: String,
    },
    /// List stored session ids.
    Sessions,
    /// Serve the upload and question HTTP API.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value = "8080")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    let inference = InferenceClient::new(InferenceConfig {
        base_url: cli.inference_url.clone(),
        api_key: cli.inference_api_key.clone(),
        summary_model: cli.summary_model.clone(),
        answer_model: cli.answer_model.clone(),
        timeout: Duration::from_secs(cli.inference_timeout_secs),
    })
    .map_err(|error| anyhow::anyhow!(error.to_string()))?;

    let pipeline = AssistPipeline::new(
        DocumentTextExtractor::from_env(),
        FileSessionStore::new(&cli.sessions_dir),
        inference.clone(),
        inference,
        AnalysisOptions::default(),
    );

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "doc-assist boot"
    );

    match cli.command {
        Command::Analyze { file } => {
            let document = Document::from_path(Path::new(&file))
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;
            info!(file = %file, bytes = document.bytes.len(), "analyzing document");

            let receipt = pipeline
                .ingest_document(&document)
                .await
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;

            println!("session: {}", receipt.session_id);
            println!("checksum: {}", receipt.checksum);
            println!("summary:\n{}", receipt.summary);
        }
        Command::Ask { session, question } => {
            let outcome = pipeline
                .answer_question(&session, &question)
                .await
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;

            println!("summary:\n{}", outcome.summary);
            println!("question: {}", outcome.question);
            println!(
                "answer: {} (score {:.3})",
                outcome.answer.text, outcome.answer.score
            );
        }
        Command::Sessions => {
            let sessions = pipeline
                .list_sessions()
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;
            if sessions.is_empty() {
                println!("no stored sessions");
            }
            for session_id in sessions {
                println!("{session_id}");
            }
        }
        Command::Serve { port } => {
            server::serve(pipeline, port).await?;
        }
    }

    Ok(())
}
