/*
[INPUT]:  CLI arguments, YAML configuration file, OS shutdown signals
[OUTPUT]: Tasks created, updated or shown through the task form
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use taskdesk_client::{SessionToken, TaskField, TaskId, TaskdeskClient};
use taskdesk_form::commands::{CommandContext, CommandOutcome, FieldEdit, parse_assignment};
use taskdesk_form::form::{FieldErrors, TracingHost};
use taskdesk_form::TaskdeskConfig;

#[derive(Parser, Debug)]
#[command(name = "taskdesk", version, about = "Add and edit tasks on a taskdesk server")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    /// Overrides api.base_url from the config file
    #[arg(long = "base-url", value_name = "URL")]
    base_url: Option<String>,
    /// Overrides session.token from the config file
    #[arg(long = "token", env = "TASKDESK_TOKEN", hide_env_values = true)]
    token: Option<String>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new task
    Add(AddArgs),
    /// Load a task, apply edits in order, and save it
    Edit {
        id: String,
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        set: Vec<FieldEdit>,
        /// Validate and print the request without sending it
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
    /// Print the editable fields of a task as JSON
    Show { id: String },
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    description: String,
    /// YYYY-MM-DD
    #[arg(long = "due-date")]
    due_date: Option<String>,
    /// YYYY-MM-DDTHH:MM
    #[arg(long)]
    reminder: Option<String>,
    #[arg(long)]
    priority: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long = "dry-run")]
    dry_run: bool,
}

impl AddArgs {
    fn edits(&self) -> Vec<FieldEdit> {
        let mut edits = vec![(TaskField::Description, self.description.clone())];
        let optional = [
            (TaskField::DueDate, &self.due_date),
            (TaskField::Reminder, &self.reminder),
            (TaskField::Priority, &self.priority),
            (TaskField::Status, &self.status),
        ];
        for (field, value) in optional {
            if let Some(value) = value {
                edits.push((field, value.clone()));
            }
        }
        edits
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let mut config = TaskdeskConfig::load(args.config_path.as_deref()).context("load config")?;
    if let Some(base_url) = &args.base_url {
        config.api.base_url = base_url.clone();
    }
    info!(base_url = %config.api.base_url, "configuration loaded");

    let client = TaskdeskClient::with_config_and_base_url(config.client_config(), &config.api.base_url)
        .context("build HTTP client")?;
    let token = resolve_token(&args, &config)?;

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    let context = CommandContext {
        store: Arc::new(client),
        token,
        shutdown,
    };

    match args.command {
        Command::Add(add) => {
            let outcome = context
                .save(Box::new(TracingHost), None, &add.edits(), add.dry_run)
                .await
                .context("add task")?;
            report(outcome)
        }
        Command::Edit { id, set, dry_run } => {
            let outcome = context
                .save(Box::new(TracingHost), Some(TaskId::from(id)), &set, dry_run)
                .await
                .context("edit task")?;
            report(outcome)
        }
        Command::Show { id } => {
            let draft = context
                .show(Box::new(TracingHost), TaskId::from(id))
                .await
                .context("load task")?;
            println!("{}", serde_json::to_string_pretty(&draft)?);
            Ok(())
        }
    }
}

fn resolve_token(args: &Cli, config: &TaskdeskConfig) -> Result<SessionToken> {
    if let Some(token) = &args.token {
        return Ok(SessionToken::new(token.clone()));
    }
    config
        .session_manager()
        .require_token()
        .context("no usable session token; pass --token, set TASKDESK_TOKEN, or add session.token to the config")
}

fn report(outcome: CommandOutcome) -> Result<()> {
    match outcome {
        CommandOutcome::Saved { message } => {
            println!("{}", message.as_deref().unwrap_or("Task saved"));
            Ok(())
        }
        CommandOutcome::DryRun { method, path, body } => {
            println!("{method} {path}");
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        CommandOutcome::Invalid(errors) => {
            print_field_errors(&errors);
            bail!("task has {} invalid field(s)", errors.len())
        }
    }
}

fn print_field_errors(errors: &FieldErrors) {
    for (field, message) in errors.iter() {
        eprintln!("{field}: {message}");
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
