use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "resume-intake",
    version,
    about = "Submit a résumé to the intake endpoint from the terminal"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Intake API base URL (overrides RESUME_API_BASE_URL)")]
    pub base_url: Option<String>,
    #[arg(long, global = true, help = "Per-request timeout in seconds, 30-90")]
    pub timeout_secs: Option<u64>,
    #[arg(long, global = true, help = "Chat user id (overrides TELEGRAM_USER_ID)")]
    pub telegram_id: Option<String>,
    #[arg(long, global = true, help = "Print the final form state as JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate and upload a résumé, then press Continue.
    Upload {
        path: PathBuf,
        #[arg(long, help = "Agree to the processing terms (required to continue)")]
        consent: bool,
        #[arg(long, help = "Declared media type; guessed from the extension if omitted")]
        media_type: Option<String>,
    },
    /// Tell the backend the résumé will come later.
    Skip,
    /// Check that the upload endpoint answers.
    Probe,
}
