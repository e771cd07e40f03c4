use clap::{Parser, ValueEnum};

use crate::query::ResourceKind;

pub const DEFAULT_API_ROOT: &str = "https://api.novem.io/v1";

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProgressMode {
    /// Enable progress UI when stderr is a TTY.
    Auto,
    /// Always enable progress UI (even when piped).
    Always,
    /// Never show progress UI.
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Color output when stdout is a TTY.
    Auto,
    Always,
    Never,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Identifier of the visualization whose discussion to show.
    pub id: String,

    /// Visualization family the id belongs to.
    #[arg(long, value_enum, default_value = "plots")]
    pub kind: ResourceKind,

    /// Look the visualization up under this author instead of the caller.
    #[arg(long)]
    pub author: Option<String>,

    /// Your own username; your comments are highlighted.
    #[arg(long, env = "NOVEM_USER", default_value = "")]
    pub me: String,

    /// API token sent as a bearer credential.
    #[arg(long, env = "NOVEM_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// REST API root. The GraphQL endpoint is derived from it (`/v1` becomes `/gql`).
    #[arg(long, env = "NOVEM_API_ROOT", default_value = DEFAULT_API_ROOT)]
    pub api_root: String,

    /// HTTP User-Agent.
    #[arg(long, default_value = concat!("vis-comments/", env!("CARGO_PKG_VERSION")))]
    pub user_agent: String,

    /// Print the fetched topic tree as JSON instead of rendering it.
    #[arg(long)]
    pub raw: bool,

    /// Color output: `auto`, `always`, or `never`.
    #[arg(long, value_enum, default_value = "auto")]
    pub color: ColorMode,

    /// Progress display: `auto`, `always`, or `never`.
    #[arg(long, value_enum, default_value = "auto")]
    pub progress: ProgressMode,
}
