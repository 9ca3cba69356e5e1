//! resume-ranker: rank Drive-hosted resumes against a job description

use clap::Parser;
use log::{error, info};
use resume_ranker::auth::{StaticTokenSource, TokenSource};
use resume_ranker::cli::{self, Cli, Commands, ConfigAction, ModelAction, SessionCommand, SESSION_HELP};
use resume_ranker::config::{Config, OutputFormat};
use resume_ranker::drive::{parse_reference, share_link, DriveGateway};
use resume_ranker::error::{RankerError, Result};
use resume_ranker::export::SmtpMailer;
use resume_ranker::input::InputManager;
use resume_ranker::output::{save_report_to_file, suggest_filename, RankedTable, ReportGenerator};
use resume_ranker::processing::embedding_manager::EmbeddingModelManager;
use resume_ranker::processing::{EmbeddingEngine, MatchPipeline, MatchRequest, RunReport};
use resume_ranker::session::Session;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, config_path).await {
        error!("{}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: PathBuf) -> Result<()> {
    match command {
        Commands::Rank {
            job,
            job_text,
            folder,
            output,
            save,
            email,
            no_progress,
        } => {
            let format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(RankerError::InvalidInput)?,
                None => config.output.format,
            };

            let job_description = match (job, job_text) {
                (Some(path), _) => InputManager::new().read_job_description(&path).await?,
                (None, Some(text)) => text,
                (None, None) => {
                    return Err(RankerError::InvalidInput(
                        "a job description is required (--job or --job-text)".to_string(),
                    ))
                }
            };

            // Fail on a bad link before paying for authentication and model loading
            parse_reference(&folder)?;

            let pipeline = build_pipeline(&config, !no_progress).await?;
            let mut session = Session::new();

            let report = pipeline.run(&MatchRequest::new(job_description, folder)).await?;
            print_run_summary(&report);

            if let Some(table) = session.record(&report) {
                let generator = ReportGenerator::new(config.output.color_output);
                let rendered = generator.generate(table, format)?;
                match save {
                    Some(path) => {
                        let path = resolve_save_path(&path, format);
                        save_report_to_file(&rendered, &path)?;
                        println!("💾 Results saved to {}", path.display());
                    }
                    None => println!("{}", rendered),
                }
            }

            if email {
                export_results(&session, &config).await?;
            }
        }

        Commands::Session => run_session(&config).await?,

        Commands::Resolve { url } => {
            let reference = parse_reference(&url)?;
            println!("{}", reference);
            println!("As a file link: {}", share_link(reference.as_str()));
        }

        Commands::Models { action } => {
            let mut manager = EmbeddingModelManager::new(config.get_models_dir()).await?;
            match action {
                ModelAction::List => {
                    println!("📚 Embedding models\n");
                    for (id, info) in manager.list_available_models() {
                        let status = if manager.is_model_downloaded(id) { "✅" } else { "  " };
                        let default = if *id == config.models.default_embedding_model { " (default)" } else { "" };
                        println!("{} {}{}", status, id, default);
                        println!("     {} | {} dims | ~{} MB", info.repo_id, info.dimensions, info.size_mb);
                        println!("     {}", info.description);
                    }
                }
                ModelAction::Download { model } => {
                    let model_id = manager.resolve_model_id(&model).ok_or_else(|| {
                        RankerError::InvalidInput(format!("Unknown embedding model: {}", model))
                    })?;
                    let path = manager.download_model(&model_id).await?;
                    println!("✅ {} available at {}", model_id, path.display());
                }
            }
        }

        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                let content = toml::to_string_pretty(&redacted(&config))
                    .map_err(|e| RankerError::Configuration(e.to_string()))?;
                println!("{}", content);
            }
            ConfigAction::Reset => {
                Config::default().save_to(&config_path)?;
                println!("🔄 Configuration reset: {}", config_path.display());
            }
            ConfigAction::Path => println!("{}", config_path.display()),
        },
    }

    Ok(())
}

/// Authenticate against Drive and load the embedding model once
async fn build_pipeline(config: &Config, show_progress: bool) -> Result<MatchPipeline> {
    let token = StaticTokenSource::from_config(&config.drive).access_token()?;
    let gateway = DriveGateway::from_config(&config.drive, token)?;

    info!("Loading embedding model {}", config.models.default_embedding_model);
    let encoder = EmbeddingEngine::from_config(config).await?.shared();

    Ok(MatchPipeline::new(Arc::new(gateway), encoder).with_progress(show_progress))
}

fn print_run_summary(report: &RunReport) {
    if report.no_files_found() {
        println!("⚠️  No resume files found in the folder");
        return;
    }
    for skip in &report.skipped {
        println!("⚠️  Skipped {}: {}", skip.name, skip.reason);
    }
}

fn resolve_save_path(path: &Path, format: OutputFormat) -> PathBuf {
    if path.is_dir() {
        path.join(suggest_filename(format, true))
    } else {
        path.to_path_buf()
    }
}

fn redacted(config: &Config) -> Config {
    let mut shown = config.clone();
    if shown.drive.access_token.is_some() {
        shown.drive.access_token = Some("***".to_string());
    }
    if shown.email.password.is_some() {
        shown.email.password = Some("***".to_string());
    }
    shown
}

/// Line-oriented stand-in for the match page: the pipeline and the model are
/// built once and reused by every `run`.
async fn run_session(config: &Config) -> Result<()> {
    let pipeline = build_pipeline(config, true).await?;
    let generator = ReportGenerator::new(config.output.color_output);
    let input = InputManager::new();
    let mut session = Session::new();
    let mut job_description = String::new();
    let mut folder_url = String::new();

    println!("Resume matching session. Type 'help' for commands.");
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match SessionCommand::parse(&line) {
            Ok(command) => command,
            Err(msg) => {
                println!("{}", msg);
                continue;
            }
        };

        let outcome = match command {
            SessionCommand::JobFile(path) => input.read_job_description(&path).await.map(|text| {
                println!("Job description loaded ({} characters)", text.len());
                job_description = text;
            }),
            SessionCommand::JobText(text) => {
                job_description = text;
                Ok(())
            }
            SessionCommand::Folder(url) => parse_reference(&url).map(|reference| {
                println!("Folder id: {}", reference);
                folder_url = url;
            }),
            SessionCommand::Run => {
                let request = MatchRequest::new(job_description.clone(), folder_url.clone());
                pipeline.run(&request).await.and_then(|report| {
                    print_run_summary(&report);
                    match session.record(&report) {
                        Some(table) => show_table(&generator, Some(table), config.output.format),
                        None => Ok(()),
                    }
                })
            }
            SessionCommand::Show(format) => show_table(
                &generator,
                session.last_table(),
                format.unwrap_or(config.output.format),
            ),
            SessionCommand::Export => export_results(&session, config).await,
            SessionCommand::Help => {
                println!("{}", SESSION_HELP);
                Ok(())
            }
            SessionCommand::Quit => break,
        };

        if let Err(e) = outcome {
            println!("❌ {}", e);
        }
    }

    Ok(())
}

/// Email the session's last table; refuses before any successful run
async fn export_results(session: &Session, config: &Config) -> Result<()> {
    if session.last_table().is_none() {
        return Err(RankerError::ExportPrecondition);
    }
    let mailer = SmtpMailer::from_config(&config.email)?;
    session.export(&mailer, &config.email).await?;
    println!("📧 Results emailed to {}", config.email.receiver);
    Ok(())
}

fn show_table(generator: &ReportGenerator, table: Option<&RankedTable>, format: OutputFormat) -> Result<()> {
    match table {
        Some(table) => {
            println!("{}", generator.generate(table, format)?);
            Ok(())
        }
        None => {
            println!("No results yet. Use 'run' first.");
            Ok(())
        }
    }
}
