//! Command-line front end over the input-safety library.
//!
//! Results are printed to stdout as JSON. A command whose input fails
//! validation exits with [`EXIT_INVALID`].

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use ig_core::{
    encode_uri_component, escape_html, generate_token, is_valid_email, is_valid_username,
    sanitize_description, sanitize_name, sanitize_search_query, validate_campaign_data,
    validate_chat_message, validate_password, CampaignDraft, LimitsConfig,
};
use ig_store::{FileStore, ObfuscatedStore};

/// Exit code for input that was read fine but failed validation.
pub const EXIT_INVALID: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "inputguard", version, about = "Validate and sanitize untrusted input")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a campaign draft read from a JSON file (`-` for stdin)
    Campaign { file: PathBuf },
    /// Sanitize a free-text value
    Sanitize {
        #[arg(value_enum)]
        kind: FieldKind,
        text: String,
    },
    /// Escape text for HTML, or percent-encode it with --url
    Escape {
        #[arg(long)]
        url: bool,
        text: String,
    },
    /// Check a chat message and print its escaped form
    Chat { text: String },
    /// Check password strength
    Password { password: String },
    /// Check the shape of an email address or username
    Check {
        #[arg(value_enum)]
        kind: CheckKind,
        value: String,
    },
    /// Print a fresh anti-forgery token
    Token,
    /// Validate and print rate limits (built-in defaults without a file)
    Limits { file: Option<PathBuf> },
    /// Read and write an obfuscated JSON store file
    Store {
        #[arg(long)]
        file: PathBuf,
        #[command(subcommand)]
        op: StoreOp,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FieldKind {
    Name,
    Description,
    Search,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CheckKind {
    Email,
    Username,
}

#[derive(Debug, Subcommand)]
pub enum StoreOp {
    /// Store a JSON value under a key
    Set { key: String, value: String },
    /// Print the value under a key, or `null`
    Get { key: String },
    /// Remove a key
    Remove { key: String },
    /// Remove every key
    Clear,
}

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    kind: &'a str,
    valid: bool,
}

/// Run a parsed command and return the process exit code.
pub fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Campaign { file } => {
            let content = read_input(&file)?;
            let draft: CampaignDraft =
                serde_json::from_str(&content).context("Campaign draft is not valid JSON")?;
            let result = validate_campaign_data(&draft);
            print_json(&result)?;
            Ok(exit_code(result.is_valid()))
        }
        Command::Sanitize { kind, text } => {
            let sanitized = match kind {
                FieldKind::Name => sanitize_name(&text),
                FieldKind::Description => sanitize_description(&text),
                FieldKind::Search => sanitize_search_query(&text),
            };
            println!("{}", sanitized);
            Ok(0)
        }
        Command::Escape { url, text } => {
            let escaped = if url {
                encode_uri_component(text.as_str())
            } else {
                escape_html(text.as_str())
            };
            println!("{}", escaped);
            Ok(0)
        }
        Command::Chat { text } => {
            let result = validate_chat_message(&text);
            print_json(&result)?;
            Ok(exit_code(result.is_valid()))
        }
        Command::Password { password } => {
            let result = validate_password(&password);
            print_json(&result)?;
            Ok(exit_code(result.is_valid()))
        }
        Command::Check { kind, value } => {
            let (kind, valid) = match kind {
                CheckKind::Email => ("email", is_valid_email(&value)),
                CheckKind::Username => ("username", is_valid_username(&value)),
            };
            print_json(&CheckReport { kind, valid })?;
            Ok(exit_code(valid))
        }
        Command::Token => {
            println!("{}", generate_token());
            Ok(0)
        }
        Command::Limits { file } => {
            let config = match file {
                Some(path) => LimitsConfig::load(&path)?,
                None => LimitsConfig::default(),
            };
            print_json(&config)?;
            Ok(0)
        }
        Command::Store { file, op } => run_store(&file, op),
    }
}

fn run_store(path: &Path, op: StoreOp) -> Result<i32> {
    let backend = FileStore::open(path)
        .with_context(|| format!("Failed to open store {}", path.display()))?;
    let mut store = ObfuscatedStore::new(backend);

    match op {
        StoreOp::Set { key, value } => {
            let value: serde_json::Value =
                serde_json::from_str(&value).context("Value must be valid JSON")?;
            store.set(&key, &value);
        }
        StoreOp::Get { key } => {
            let value = store.get::<serde_json::Value>(&key);
            print_json(&value)?;
        }
        StoreOp::Remove { key } => store.remove(&key),
        StoreOp::Clear => store.clear(),
    }
    Ok(0)
}

/// Read a whole file, or stdin when the path is `-`.
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        return Ok(content);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn exit_code(valid: bool) -> i32 {
    if valid {
        0
    } else {
        EXIT_INVALID
    }
}
