use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use docbot::infrastructure::observability::{TracingConfig, init_tracing};
use docbot::infrastructure::pdf_tools::{categorize_pdfs, split_pdf_by_size};
use docbot::infrastructure::persistence::{write_embedding_collection, write_text_dump};
use docbot::presentation::{Environment, Services, Settings, create_router};

#[derive(Parser)]
#[command(name = "docbot")]
#[command(about = "Ask questions about your PDF and Confluence documentation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server and web page (default)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },

    /// Extract, chunk and embed every PDF in a directory
    Ingest {
        /// Directory searched recursively for *.pdf
        #[arg(long)]
        input_dir: Option<PathBuf>,

        /// Where <name>_embeddings.json files are written
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Also write all extracted text to this JSON file
        #[arg(long)]
        dump: Option<PathBuf>,
    },

    /// Index a single Confluence page
    Confluence {
        #[arg(long)]
        space_key: String,

        #[arg(long)]
        page_title: String,
    },

    /// Interactive question loop on stdin
    Chat,

    /// Answer one question and exit
    Ask { question: String },

    /// Split a PDF into parts of roughly the given size
    SplitPdf {
        input: PathBuf,
        output_dir: PathBuf,

        #[arg(long, default_value_t = 1.0)]
        max_size_mb: f64,
    },

    /// Move PDFs into small/medium/large folders by file size
    Categorize { source: PathBuf, target: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    let _log_guard = init_tracing(
        &TracingConfig {
            environment: environment.to_string(),
            json_format: settings.logging.json,
            filter: settings.logging.level.clone(),
            log_file: settings.logging.file.clone(),
        }
        .with_env_overrides(),
    );

    let command = cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    });

    match command {
        Commands::Serve { host, port } => serve(&settings, host, port).await,
        Commands::Ingest {
            input_dir,
            output_dir,
            dump,
        } => {
            let input_dir = input_dir.unwrap_or_else(|| settings.ingestion.input_dir.clone());
            let output_dir = output_dir.unwrap_or_else(|| settings.ingestion.output_dir.clone());
            ingest_directory(&settings, input_dir, output_dir, dump).await
        }
        Commands::Confluence {
            space_key,
            page_title,
        } => {
            let services = Services::from_settings(&settings).await?;
            let confluence = services.confluence_ingestion.context(
                "Confluence is not configured: set APP__CONFLUENCE__BASE_URL and APP__CONFLUENCE__ACCESS_TOKEN",
            )?;
            let document = confluence.load_page(&space_key, &page_title).await?;
            println!(
                "Content from '{}' has been indexed ({} chunks).",
                page_title, document.report.chunks_stored
            );
            Ok(())
        }
        Commands::Chat => chat(&settings).await,
        Commands::Ask { question } => {
            let services = Services::from_settings(&settings).await?;
            println!("{}", services.retrieval.answer(&question).await);
            Ok(())
        }
        Commands::SplitPdf {
            input,
            output_dir,
            max_size_mb,
        } => {
            let parts = tokio::task::spawn_blocking(move || {
                split_pdf_by_size(&input, &output_dir, max_size_mb)
            })
            .await??;
            for part in parts {
                println!(
                    "Saved {} with size {:.2} MB",
                    part.path.display(),
                    part.size_bytes as f64 / (1024.0 * 1024.0)
                );
            }
            Ok(())
        }
        Commands::Categorize { source, target } => {
            let categories =
                tokio::task::spawn_blocking(move || categorize_pdfs(&source, &target)).await??;
            for (category, files) in categories {
                println!("{category}: {}", files.join(", "));
            }
            Ok(())
        }
    }
}

async fn serve(settings: &Settings, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let services = Services::from_settings(settings).await?;

    let max_upload_bytes = usize::try_from(settings.ingestion.max_file_size_bytes())
        .unwrap_or(usize::MAX);
    let router = create_router(services.app_state(max_upload_bytes));

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid listen address {host}:{port}"))?;

    tracing::info!(%addr, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}

async fn ingest_directory(
    settings: &Settings,
    input_dir: PathBuf,
    output_dir: PathBuf,
    dump: Option<PathBuf>,
) -> anyhow::Result<()> {
    let services = Services::from_settings(settings).await?;
    let report = services.directory_ingestion.ingest_directory(&input_dir).await?;

    let mut texts = BTreeMap::new();
    for (filename, document) in &report.documents {
        write_embedding_collection(&output_dir, filename, &document.entries).await?;
        println!(
            "{filename}: {} chunks stored, {} skipped",
            document.report.chunks_stored, document.report.chunks_skipped
        );
        texts.insert(filename.clone(), document.text.clone());
    }

    for (path, error) in &report.failures {
        eprintln!("{}: {error}", path.display());
    }

    if let Some(dump) = dump {
        write_text_dump(&dump, &texts).await?;
        println!("Extracted text written to {}", dump.display());
    }

    println!(
        "Processed {} files ({} failed).",
        report.documents.len() + report.failures.len(),
        report.failures.len()
    );
    Ok(())
}

async fn chat(settings: &Settings) -> anyhow::Result<()> {
    let services = Services::from_settings(settings).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout
            .write_all(b"Ask a question (or type 'exit' to quit): ")
            .await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.eq_ignore_ascii_case("exit") {
            break;
        }
        if question.is_empty() {
            println!("Please enter a question.");
            continue;
        }

        let answer = services.retrieval.answer(question).await;
        println!("Chatbot response: {answer}");
    }

    Ok(())
}
