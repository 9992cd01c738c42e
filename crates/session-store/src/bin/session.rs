//! `session` command: drive and observe a file-backed login session.
//!
//! Every invocation is one execution context on the origin directory, so
//! running `session watch` in one terminal and `session login` in another
//! shows cross-process convergence.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use serde_json::json;
use session_store::{
    FileStorage, FileWatcher, Origin, SessionHook, SessionStore, SessionView, UserRecord,
};
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `session` command arguments.
#[derive(Debug, Parser)]
#[command(name = "session", about = "Inspect and drive a shared login session", version)]
struct Cli {
    /// Origin directory holding `storage.json`.
    #[arg(long, value_name = "path", default_value = ".session")]
    dir: Utf8PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Store a token and user record.
    Login {
        /// Bearer token returned by the login endpoint.
        #[arg(long)]
        token: String,
        /// JSON file holding the user record.
        #[arg(long = "user-file", value_name = "path")]
        user_file: PathBuf,
    },
    /// Remove the session.
    Logout,
    /// Print the current session.
    Show,
    /// Print every session change until interrupted.
    Watch {
        /// Poll interval for changes made by other processes.
        #[arg(long = "interval-ms", default_value_t = 250)]
        interval_ms: u64,
    },
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> io::Result<()> {
    let storage = Arc::new(FileStorage::open(&cli.dir).map_err(io::Error::other)?);
    let origin = Origin::new(storage.clone());
    let store = SessionStore::new(&origin);

    match cli.command {
        Command::Login { token, user_file } => {
            let user = read_user(&user_file)?;
            let session = store.login(&token, &user).map_err(io::Error::other)?;
            write_line(&format!("logged in as {}", session.user().username))
        }
        Command::Logout => {
            store.logout().map_err(io::Error::other)?;
            write_line("logged out")
        }
        Command::Show => {
            let hook = SessionHook::new(store);
            write_line(&render(&hook.view()))
        }
        Command::Watch { interval_ms } => {
            let hook = Arc::new(SessionHook::new(store));
            let watcher = FileWatcher::new(&origin, storage)
                .spawn(Duration::from_millis(interval_ms));
            let listener = hook.listen();
            let result = watch(&hook).await;
            watcher.abort();
            listener.abort();
            result
        }
    }
}

async fn watch(hook: &SessionHook) -> io::Result<()> {
    let mut view = hook.subscribe();
    write_line(&render(&view.borrow_and_update()))?;
    loop {
        tokio::select! {
            changed = view.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let rendered = render(&view.borrow_and_update());
                write_line(&rendered)?;
            }
            signal = tokio::signal::ctrl_c() => return signal,
        }
    }
}

fn read_user(path: &Path) -> io::Result<UserRecord> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|error| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid user record in {}: {error}", path.display()),
        )
    })
}

fn render(view: &SessionView) -> String {
    let value = view.session.as_ref().map_or_else(
        || json!({ "authenticated": false }),
        |session| json!({ "authenticated": true, "user": session.user() }),
    );
    value.to_string()
}

fn write_line(line: &str) -> io::Result<()> {
    writeln!(io::stdout().lock(), "{line}")
}
