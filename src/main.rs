//! bucketdeck - drive a remote file-storage management API from the terminal.
//!
//! Usage:
//!   bucketdeck upload FILE... [--prefix P]    Upload local files
//!   bucketdeck delete PATH...                 Delete files (batch when several)
//!   bucketdeck rm-folder PREFIX               Delete a folder and its contents
//!   bucketdeck rename KEY [NEW_NAME]          Rename a file or folder
//!   bucketdeck copy SOURCE [DEST_DIR]         Copy into a folder
//!   bucketdeck move SOURCE [DEST_DIR]         Move into a folder
//!   bucketdeck mkdir [NAME] [--prefix P]      Create a folder
//!   bucketdeck download KEY_OR_URL            Download into a local directory
//!
//! Arguments left out are asked for in a dialog.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use bucketdeck_core::{AppConfig, OperationTarget, copy_destination, file_name, join_prefix};
use bucketdeck_dialog::DialogController;
use bucketdeck_ops::{
    ActionOutcome, DeleteOptions, DownloadRequest, EventSink, FileActions, HttpStorageClient,
    OperationContext, StatusReporter, TransferKind, UploadFile,
};
use bucketdeck_tui::App;

#[derive(Parser)]
#[command(
    name = "bucketdeck",
    version,
    about = "Terminal controller for a remote file-storage management API",
    long_about = "bucketdeck sends upload, delete, rename, copy, move, folder and \
                  download requests to a storage management server, asking for \
                  confirmation in a terminal dialog."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// Config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Server base URL, overriding the config file
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds, overriding the config file
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Answer every confirmation with yes and print status lines instead of
    /// drawing the terminal UI
    #[arg(short, long, global = true)]
    yes: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Upload local files into a folder
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Destination folder prefix (e.g. "docs/")
        #[arg(short, long, default_value = "")]
        prefix: String,
    },

    /// Delete files; several paths run as one batch
    Delete {
        /// Storage keys; asked for when left out
        paths: Vec<String>,
    },

    /// Delete a folder and everything under it
    RmFolder {
        /// Folder prefix (e.g. "docs/old/")
        prefix: String,
    },

    /// Rename a file or folder
    Rename {
        /// Current storage key or folder prefix
        key: String,

        /// New name; asked for when left out
        new_name: Option<String>,

        /// Treat KEY as a folder prefix
        #[arg(short, long)]
        folder: bool,
    },

    /// Copy a file or folder into another folder
    Copy(TransferArgs),

    /// Move a file or folder into another folder
    Move(TransferArgs),

    /// Create a folder
    Mkdir {
        /// Folder name; asked for when left out
        name: Option<String>,

        /// Parent folder prefix
        #[arg(short, long, default_value = "")]
        prefix: String,
    },

    /// Download a storage key or a download link
    Download {
        /// Storage key, `/download/...` route or absolute URL
        source: String,

        /// Local directory to save into
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// File name to save as
        #[arg(short, long)]
        name: Option<String>,
    },
}

#[derive(Args)]
struct TransferArgs {
    /// Source storage key or folder prefix
    source: String,

    /// Destination folder; asked for when left out
    dest: Option<String>,

    /// Treat SOURCE as a folder prefix
    #[arg(short, long)]
    folder: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_logging();

    let cli = Cli::parse();
    let config = load_config(&cli.global)?;

    let client = HttpStorageClient::new(config.client.clone()).context("Invalid client config")?;
    let dialog = DialogController::builder()
        .settle_delay(config.timing.dialog_settle())
        .build();
    let status = StatusReporter::new();
    let (events, events_rx) = EventSink::channel();
    let actions = FileActions::new(OperationContext::new(
        Arc::new(client),
        dialog.clone(),
        status.clone(),
        events,
        config.timing.clone(),
    ));

    let title = cli.command.title();
    let work = execute(&actions, cli.command);

    let outcome = if cli.global.yes {
        let mut stdout = std::io::stdout();
        Some(bucketdeck_tui::run_unattended(&dialog, &status, &mut stdout, work).await)
    } else {
        let app = App::new(dialog.clone(), status.clone())
            .with_events(events_rx)
            .with_title(title);
        bucketdeck_tui::run(app, work).await?
    };

    match outcome {
        Some(Ok(ActionOutcome::Failed)) => bail!("operation failed"),
        Some(Err(e)) => Err(e),
        Some(Ok(_)) | None => Ok(()),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("BUCKETDECK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(args: &GlobalArgs) -> Result<AppConfig> {
    let mut config = AppConfig::load(args.config.as_deref()).context("Failed to load config")?;

    if let Some(url) = &args.base_url {
        config.client.base_url = url.clone();
    }
    if let Some(secs) = args.timeout {
        config.client.request_timeout_ms = secs.saturating_mul(1000);
    }

    config.client.validate()?;
    tracing::debug!(base_url = %config.client.base_url, "Config loaded");
    Ok(config)
}

impl Command {
    fn title(&self) -> String {
        match self {
            Command::Upload { files, .. } => format!("upload · {} file(s)", files.len()),
            Command::Delete { paths } => format!("delete · {} item(s)", paths.len()),
            Command::RmFolder { prefix } => format!("rm-folder · {prefix}"),
            Command::Rename { key, .. } => format!("rename · {key}"),
            Command::Copy(args) => format!("copy · {}", args.source),
            Command::Move(args) => format!("move · {}", args.source),
            Command::Mkdir { prefix, .. } => format!("mkdir · /{prefix}"),
            Command::Download { source, .. } => format!("download · {source}"),
        }
    }
}

/// Run one subcommand to completion.
async fn execute(
    actions: &FileActions<HttpStorageClient>,
    command: Command,
) -> Result<ActionOutcome> {
    let outcome = match command {
        Command::Upload { files, prefix } => {
            let mut uploads = Vec::with_capacity(files.len());
            for path in &files {
                uploads.push(UploadFile::from_path(path).await?);
            }
            actions.upload_files(uploads, &prefix).await
        }
        Command::Delete { paths } => match paths.as_slice() {
            [] => actions.prompt_delete().await,
            [path] => actions.delete_file(path, DeleteOptions::default()).await,
            _ => {
                let targets = paths.into_iter().map(OperationTarget::file).collect();
                match actions.delete_selected(targets).await {
                    Some(job) if job.is_success() => ActionOutcome::Completed,
                    Some(_) => ActionOutcome::Failed,
                    None => ActionOutcome::Abandoned,
                }
            }
        },
        Command::RmFolder { prefix } => actions.delete_folder(&prefix).await,
        Command::Rename {
            key,
            new_name,
            folder,
        } => match new_name {
            Some(new_name) => actions.rename(&key, &new_name, folder).await,
            None => {
                let old_name = file_name(key.trim_end_matches('/')).to_string();
                actions.prompt_rename(&key, &old_name, folder).await
            }
        },
        Command::Copy(args) => transfer(actions, TransferKind::Copy, args).await,
        Command::Move(args) => transfer(actions, TransferKind::Move, args).await,
        Command::Mkdir { name, prefix } => match name {
            Some(name) => actions.create_folder(&join_prefix(&prefix, &name)).await,
            None => actions.prompt_create_folder(&prefix).await,
        },
        Command::Download { source, out, name } => download(actions, &source, &out, name).await,
    };

    Ok(outcome)
}

async fn transfer(
    actions: &FileActions<HttpStorageClient>,
    kind: TransferKind,
    args: TransferArgs,
) -> ActionOutcome {
    match args.dest {
        Some(dest) => {
            let destination = copy_destination(&args.source, &dest, args.folder);
            actions
                .transfer(kind, &args.source, &destination, args.folder)
                .await
        }
        None => {
            actions
                .prompt_copy_or_move(&args.source, args.folder, kind)
                .await
        }
    }
}

async fn download(
    actions: &FileActions<HttpStorageClient>,
    source: &str,
    out: &Path,
    name: Option<String>,
) -> ActionOutcome {
    let is_link = source.contains("://") || source.starts_with('/');
    if is_link {
        actions.download_url(source, name, out).await
    } else {
        let request = DownloadRequest::for_key(source);
        let request = match name {
            Some(name) => request.with_file_name(name),
            None => request,
        };
        actions.download(request, out).await
    }
}
