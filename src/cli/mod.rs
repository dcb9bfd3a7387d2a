use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::bundle::TemplateKind;

#[derive(ValueEnum, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
    Anthropic,
    Ollama,
}

#[derive(Parser, Debug)]
#[command(name = "voiceable", version, about = "Describe an accessibility need, get a ready-to-run web app")]
pub struct Args {
    /// Description of the tool; asked interactively when omitted.
    #[arg(long)]
    pub prompt: Option<String>,

    /// screen-reader, planner, medication or custom (unknown names mean custom).
    #[arg(long)]
    pub template: Option<TemplateKind>,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long)]
    pub model: Option<String>,

    /// Skip the remote generator and use the built-in templates.
    #[arg(long, default_value_t = false)]
    pub offline: bool,

    /// Directory the archive is written to.
    #[arg(long)]
    pub out: Option<String>,

    /// Project root for history and saved transactions.
    #[arg(long)]
    pub root: Option<String>,

    /// Write the files into a preview directory and open the entry page.
    #[arg(long, default_value_t = false)]
    pub preview: bool,

    /// With --preview, only write the files.
    #[arg(long, default_value_t = false)]
    pub no_open: bool,

    /// Also unpack the files next to the archive.
    #[arg(long, default_value_t = false)]
    pub unpack: bool,

    /// Print deployment instructions.
    #[arg(long, default_value_t = false)]
    pub instructions: bool,

    /// Show the N most recent generated tools and exit.
    #[arg(long)]
    pub history: Option<usize>,

    /// Forget all recorded tools and exit.
    #[arg(long, default_value_t = false)]
    pub clear_history: bool,

    /// Skip the progress pacing.
    #[arg(long, default_value_t = false)]
    pub fast: bool,

    /// Do not ask for confirmation.
    #[arg(long, short = 'y', default_value_t = false)]
    pub yes: bool,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, default_value_t = false)]
    pub save_request: bool,

    #[arg(long, default_value_t = false)]
    pub save_response: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,

    #[arg(long)]
    pub config: Option<String>,
}
