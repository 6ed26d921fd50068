use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_WORKSPACE_KEY: &str = "test";

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormatArg {
    Auto,
    #[value(name = "12h")]
    H12,
    #[value(name = "24h")]
    H24,
}

#[derive(clap::Parser, Debug)]
#[command(name = "tokescope-dashboard", about = "Live terminal dashboard for TokeScope usage metrics")]
pub struct Args {
    /// Base URL of the metrics service
    #[arg(long, env = "TOKESCOPE_API_BASE", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Workspace key used when none has been saved yet
    #[arg(long = "key", env = "TOKESCOPE_API_KEY", default_value = DEFAULT_WORKSPACE_KEY)]
    pub default_key: String,

    /// Credential store location. Defaults to ~/.tokescope/dashboard.db
    #[arg(long, env = "TOKESCOPE_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Time display: auto|12h|24h
    #[arg(long = "time", value_enum, default_value_t = TimeFormatArg::Auto)]
    pub time_fmt: TimeFormatArg,

    /// Emit a JSON snapshot instead of the text dashboard
    #[arg(long)]
    pub json: bool,

    /// Disable colored output (NO_COLOR is honoured too)
    #[arg(long)]
    pub no_color: bool,

    /// Rows used by the cost chart
    #[arg(long, default_value_t = 8)]
    pub chart_height: usize,

    /// Debug mode: verbose logging to stderr
    #[arg(long, env = "TOKESCOPE_DEBUG")]
    pub debug: bool,
}

impl Args {
    pub fn parse() -> Self {
        <Args as clap::Parser>::parse()
    }

    pub fn color_enabled(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").is_none()
    }
}
