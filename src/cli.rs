//! CLI interface for the resume ranker

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-ranker")]
#[command(about = "Rank resumes in a Google Drive folder against a job description")]
#[command(long_about = "Downloads every PDF/DOCX resume in a Drive folder, embeds it with a local sentence-embedding model and ranks it by cosine similarity to the job description")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank the resumes in a Drive folder
    Rank {
        /// Job description file (TXT, MD)
        #[arg(short, long, required_unless_present = "job_text", conflicts_with = "job_text")]
        job: Option<PathBuf>,

        /// Job description given inline
        #[arg(long)]
        job_text: Option<String>,

        /// Google Drive folder share link
        #[arg(short, long)]
        folder: String,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Email the ranked table after the run
        #[arg(long)]
        email: bool,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Interactive session: run several matches with one loaded model
    Session,

    /// Print the identifier contained in a Drive share link
    Resolve {
        url: String,
    },

    /// Embedding model management
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List known embedding models
    List,

    /// Download an embedding model
    Download {
        /// Model id, Hugging Face repo id or display name
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// One line typed into the interactive session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    JobFile(PathBuf),
    JobText(String),
    Folder(String),
    Run,
    Show(Option<OutputFormat>),
    Export,
    Help,
    Quit,
}

pub const SESSION_HELP: &str = "\
Commands:
  job <path>      load the job description from a .txt or .md file
  text <words>    set the job description inline
  folder <url>    set the Google Drive folder link
  run             rank the resumes in the folder
  show [format]   print the last results (console, json, markdown, html)
  export          email the last results
  help            show this help
  quit            leave the session";

impl SessionCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };

        let require = |what: &str| -> Result<String, String> {
            if rest.is_empty() {
                Err(format!("'{}' needs {}", keyword, what))
            } else {
                Ok(rest.to_string())
            }
        };

        match keyword.to_lowercase().as_str() {
            "job" => require("a file path").map(|p| SessionCommand::JobFile(PathBuf::from(p))),
            "text" => require("the job description").map(SessionCommand::JobText),
            "folder" => require("a Drive folder link").map(SessionCommand::Folder),
            "run" => Ok(SessionCommand::Run),
            "show" if rest.is_empty() => Ok(SessionCommand::Show(None)),
            "show" => parse_output_format(rest).map(|f| SessionCommand::Show(Some(f))),
            "export" | "email" => Ok(SessionCommand::Export),
            "help" | "?" => Ok(SessionCommand::Help),
            "quit" | "exit" => Ok(SessionCommand::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command '{}', type 'help'", other)),
        }
    }
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html",
            format
        )),
    }
}
