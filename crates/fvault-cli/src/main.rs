//! fvault: FolderVault command-line interface
//!
//! Runs an interactive loop over one folder root:
//!   e - encrypt the folder
//!   d - decrypt the folder
//!   q - quit

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use secrecy::SecretString;

use fvault_core::config::FvaultConfig;
use fvault_core::VaultError;
use fvault_engine::{decrypt_folder, encrypt_folder, FolderReport, ProgressFn};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "fvault",
    version,
    about = "Passphrase-protected folder encryption",
    long_about = "fvault: encrypt and decrypt a folder tree in place using a \
                  passphrase-sealed folder key"
)]
struct Cli {
    /// Folder to operate on
    root: PathBuf,

    /// Path to fvault.toml configuration file
    #[arg(long, short = 'c', env = "FVAULT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "FVAULT_LOG", default_value = "warn")]
    log: String,
}

#[derive(Clone, Copy, Debug)]
enum Action {
    Encrypt,
    Decrypt,
    Quit,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log);
    let config = load_config(cli.config.as_deref())?;

    if !cli.root.is_dir() {
        anyhow::bail!("folder not found: {}", cli.root.display());
    }

    loop {
        match prompt_action()? {
            Action::Quit => break,
            action => {
                let passphrase = SecretString::from(
                    rpassword::prompt_password("Enter the passphrase: ")
                        .context("reading passphrase")?,
                );
                run_action(action, &cli.root, &passphrase, &config);
            }
        }
    }

    Ok(())
}

// ── Interactive prompt ────────────────────────────────────────────────────────

fn prompt_action() -> Result<Action> {
    loop {
        print!("Enter 'e' to encrypt, 'd' to decrypt, or 'q' to quit: ");
        std::io::stdout().flush().context("flushing stdout")?;

        let mut line = String::new();
        let read = std::io::stdin()
            .read_line(&mut line)
            .context("reading action")?;
        if read == 0 {
            // EOF behaves like quit
            return Ok(Action::Quit);
        }

        match line.trim().to_lowercase().as_str() {
            "e" => return Ok(Action::Encrypt),
            "d" => return Ok(Action::Decrypt),
            "q" => return Ok(Action::Quit),
            _ => println!("Invalid action. Please try again."),
        }
    }
}

// ── Folder operations ─────────────────────────────────────────────────────────

fn run_action(action: Action, root: &Path, passphrase: &SecretString, config: &FvaultConfig) {
    let verb = match action {
        Action::Encrypt => "encrypt",
        Action::Decrypt => "decrypt",
        Action::Quit => unreachable!("quit is handled by the main loop"),
    };

    let pb = make_progress_bar(verb);
    let pb_clone = pb.clone();
    let progress: ProgressFn = Box::new(move |done, total, msg| {
        pb_clone.set_length(total);
        pb_clone.set_position(done);
        pb_clone.set_message(msg.to_string());
    });

    let result = match action {
        Action::Encrypt => encrypt_folder(root, passphrase, config, Some(&progress)),
        Action::Decrypt => decrypt_folder(root, passphrase, config, Some(&progress)),
        Action::Quit => unreachable!(),
    };
    pb.finish_and_clear();

    match result {
        Ok(report) => print_report(verb, root, &report),
        Err(VaultError::PartialFolderFailure { processed, failed }) => {
            eprintln!(
                "Folder {verb} incomplete: {} file(s) transformed, {} failed:",
                processed.len(),
                failed.len()
            );
            for (path, reason) in &failed {
                eprintln!("  {}: {reason}", path.display());
            }
            eprintln!("Retry with the same passphrase to finish the remaining files.");
        }
        Err(e) => eprintln!("Error: {e}"),
    }
}

fn print_report(verb: &str, root: &Path, report: &FolderReport) {
    println!(
        "Folder {} {verb}ed: {} file(s) transformed, {} skipped.",
        root.display(),
        report.processed.len(),
        report.skipped.len()
    );
}

// ── Config loading ────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<FvaultConfig> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading config: {}", path.display()))?;
            toml::from_str(&content).with_context(|| format!("parsing config: {}", path.display()))
        }
        None => Ok(FvaultConfig::default()),
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

// ── Progress bar ──────────────────────────────────────────────────────────────

fn make_progress_bar(prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );
    pb.set_prefix(prefix.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
