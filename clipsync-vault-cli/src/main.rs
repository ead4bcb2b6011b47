//! ClipSync Secure Vault CLI
//!
//! Drives a vault session against a local JSON store. Useful for inspecting
//! a vault outside the app and for exercising the lock/unlock flow.
//!
//! The master password is taken from the `CLIPSYNC_MASTER_PASSWORD`
//! environment variable, or prompted for on the terminal. There is no
//! command-line flag for it, so it never shows up in the process list. It is
//! never written to disk; only the salt and ciphertext are.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use clipsync_vault::storage::load_settings;
use clipsync_vault::{FileVaultStore, VaultSession, VaultSettings, VaultState};
use dialoguer::Password;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zeroize::Zeroizing;

/// ClipSync Secure Vault
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the vault store file
    #[arg(long, default_value = "vault.json")]
    store: PathBuf,

    /// Path to a settings file (defaults are used if it does not exist)
    #[arg(long)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show whether a vault exists
    Status,
    /// Create a new vault
    Init,
    /// List decrypted items as JSON
    List,
    /// Add an item
    Add { title: String, content: String },
    /// Replace an item's title and content
    Update {
        id: String,
        title: String,
        content: String,
    },
    /// Delete an item
    Delete { id: String },
}

#[derive(Serialize)]
struct StatusOutput<'a> {
    state: VaultState,
    store: &'a std::path::Path,
}

const PASSWORD_ENV: &str = "CLIPSYNC_MASTER_PASSWORD";
const CONFIRM_ENV: &str = "CLIPSYNC_MASTER_PASSWORD_CONFIRM";

fn env_secret(name: &str) -> Option<Zeroizing<String>> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .map(Zeroizing::new)
}

fn require_terminal() -> Result<()> {
    if !std::io::stdin().is_terminal() {
        bail!("No master password provided and no TTY available. Set {}.", PASSWORD_ENV);
    }
    Ok(())
}

/// Read the master password from the environment, or prompt for it.
fn master_password() -> Result<Zeroizing<String>> {
    if let Some(password) = env_secret(PASSWORD_ENV) {
        return Ok(password);
    }
    require_terminal()?;
    Password::new()
        .with_prompt("Master password")
        .interact()
        .map(Zeroizing::new)
        .context("Failed to read master password")
}

async fn init(session: &mut VaultSession<FileVaultStore>) -> Result<()> {
    match env_secret(PASSWORD_ENV) {
        Some(password) => match env_secret(CONFIRM_ENV) {
            Some(confirm) => session.create_with_confirmation(&password, &confirm).await,
            None => session.create(&password).await,
        },
        None => {
            require_terminal()?;
            let password = Password::new()
                .with_prompt("New master password")
                .with_confirmation("Confirm master password", "Passwords don't match")
                .interact()
                .map(Zeroizing::new)
                .context("Failed to read master password")?;
            session.create(&password).await
        }
    }
    .context("Failed to create vault")
}

async fn unlock(session: &mut VaultSession<FileVaultStore>) -> Result<()> {
    let password = master_password()?;
    session
        .unlock(&password)
        .await
        .context("Failed to unlock vault")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clipsync_vault=info,clipsync_vault_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Args {
        store: store_path,
        settings,
        command,
    } = Args::parse();

    let settings = match &settings {
        Some(path) => load_settings(path)
            .with_context(|| format!("Failed to load settings from {:?}", path))?,
        None => VaultSettings::default(),
    };

    let store = FileVaultStore::new(&store_path);
    let mut session = VaultSession::open(store, settings)
        .await
        .with_context(|| format!("Failed to open vault store {:?}", store_path))?;

    match command {
        Command::Status => {
            let output = StatusOutput {
                state: session.state(),
                store: &store_path,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Init => {
            init(&mut session).await?;
            info!("Vault created at {:?}", store_path);
        }
        Command::List => {
            unlock(&mut session).await?;
            println!("{}", serde_json::to_string_pretty(session.items()?)?);
        }
        Command::Add { title, content } => {
            unlock(&mut session).await?;
            let id = session.add_item(&title, &content).await?;
            println!("{}", id);
        }
        Command::Update { id, title, content } => {
            unlock(&mut session).await?;
            session.update_item(&id, &title, &content).await?;
        }
        Command::Delete { id } => {
            unlock(&mut session).await?;
            session.delete_item(&id).await?;
        }
    }

    if session.is_unlocked() {
        session.lock()?;
    }
    Ok(())
}
