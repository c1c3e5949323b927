use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Write the session transcript as JSON to this file on exit
        #[arg(long)]
        transcript: Option<PathBuf>,
    },

    /// Extract parameters from one message and forward them to the webhook
    Ask { message: String },

    /// Only extract parameters from a message, without calling the webhook
    Extract { message: String },

    /// Print the webhook envelope for the given parameters, without any network call
    Envelope {
        /// Plan version, e.g. "Plan Year 1"
        #[arg(long = "plan-version", default_value = "")]
        version: String,

        #[arg(long, default_value = "")]
        month: String,

        #[arg(long, default_value = "")]
        measure: String,

        #[arg(long, default_value = "")]
        value: String,
    },
}
