//! Command line interface.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "newsletters",
    version,
    about = "Read the newsletters collected in your Firestore project",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save the project settings
    Configure {
        /// Firestore project ID
        #[arg(long, env = "NEWSLETTERS_PROJECT_ID")]
        project_id: String,

        /// Web API key of the project
        #[arg(long, env = "NEWSLETTERS_API_KEY")]
        api_key: String,

        /// Seconds between polls of the metadata collection
        #[arg(long)]
        poll_interval: Option<u64>,
    },

    /// Save credentials in the keyring and sign in
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Remove stored credentials and the offline cache
    Logout,

    /// Show newsletters received today
    Today {
        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show newsletters received before today
    Historical {
        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open a newsletter, marking it read
    Open {
        /// Newsletter ID
        id: String,

        /// Print the raw HTML body instead of converted text
        #[arg(long)]
        raw: bool,
    },

    /// Flip the read flag of a newsletter
    Toggle {
        /// Newsletter ID
        id: String,
    },

    /// Keep watching for new newsletters
    Watch {
        /// Show the historical view instead of today
        #[arg(long)]
        historical: bool,

        /// Don't send desktop notifications
        #[arg(long)]
        no_notify: bool,
    },
}
