mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_intake::config::Config;
use resume_intake::form::{ActionResult, FormOrchestrator};
use resume_intake::host::{Host, HostUser};
use resume_intake::models::{CandidateFile, FormView};
use resume_intake::transport::HttpTransport;
use resume_intake::upload::DropZone;

use crate::cli::{Cli, Command};

const TELEGRAM_USER_VAR: &str = "TELEGRAM_USER_ID";

/// Host for terminal sessions: already "full screen", and closing just ends
/// the command.
struct TerminalHost {
    user: Option<HostUser>,
}

impl Host for TerminalHost {
    fn expand(&self) {
        debug!("Expand requested; terminal session needs no resize");
    }

    fn close(&self) {
        info!("Session closed");
    }

    fn current_user(&self) -> Option<HostUser> {
        self.user.clone()
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration first (fails on a missing base URL)
    let mut config = Config::from_env_or(cli.base_url.as_deref())?;
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout_secs(secs)?;
    }

    // Logs go to stderr so --json output stays clean
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting resume-intake v{}", env!("CARGO_PKG_VERSION"));

    let transport = Arc::new(HttpTransport::from_config(&config)?);
    info!(
        "Intake endpoint {} (timeout {}s)",
        transport.upload_url(),
        config.upload_timeout.as_secs()
    );

    let user = cli
        .telegram_id
        .clone()
        .or_else(|| std::env::var(TELEGRAM_USER_VAR).ok())
        .map(HostUser::with_id);
    let host = Arc::new(TerminalHost { user });

    let drop_zone = DropZone::new().on_uploaded(|file| {
        info!("Resume \"{}\" has been successfully uploaded", file.name());
    });
    let mut form =
        FormOrchestrator::new(transport, host, config.identity_policy()).with_drop_zone(drop_zone);

    let succeeded = match cli.command {
        Command::Upload {
            path,
            consent,
            media_type,
        } => {
            let file = CandidateFile::from_path(&path, media_type.as_deref())
                .await
                .context("Could not load the résumé")?;
            if !form.drop_zone().picker().offers(file.name()) {
                warn!(
                    "'{}' would be hidden by the picker filter {}",
                    file.name(),
                    form.drop_zone().picker().accept()
                );
            }

            form.set_consent(consent);
            match form.submit_file(file).await {
                Some(result) => {
                    report_action(&result);
                    matches!(result, ActionResult::Closed)
                }
                None => false,
            }
        }
        Command::Skip => {
            let result = form.press_skip().await;
            report_action(&result);
            matches!(result, ActionResult::Closed)
        }
        Command::Probe => match form.probe().await {
            Ok(()) => {
                println!("Endpoint reachable");
                true
            }
            Err(err) => {
                println!("{}", err.user_message());
                false
            }
        },
    };

    let view = form.view();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&view);
    }

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn report_action(result: &ActionResult) {
    match result {
        ActionResult::Closed => info!("Form completed"),
        ActionResult::Failed(message) => warn!("Action failed: {message}"),
        ActionResult::Disabled => {
            warn!("Action is disabled (consent missing or a request is in flight)")
        }
    }
}

fn print_view(view: &FormView) {
    if let (Some(name), Some(size)) = (&view.file_name, &view.file_size) {
        println!("{name} ({size})");
    }
    if let Some(label) = view.uploaded_label() {
        println!("{label}");
    }
    println!("State: {:?}", view.state);
    if let Some(error) = &view.drop_zone_error {
        println!("{error}");
    }
    if let Some(error) = &view.form_error {
        println!("{error}");
    }
    if !view.consent && !view.closed {
        println!("Consent not given; pass --consent to continue.");
    }
    if view.closed {
        println!("Done.");
    }
}
