use anyhow::Result;
use env_logger::Env;

use tokescope_dashboard::app;
use tokescope_dashboard::cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    let default_filter = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();

    app::run(&args)
}
