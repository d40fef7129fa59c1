use color_eyre::eyre::eyre;
use color_eyre::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crafty::cli::{parse_args, run_cli_command, USAGE};

fn main() -> Result<()> {
    color_eyre::install()?;

    // Logs go to stderr so stdout stays clean for message text and reports
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("crafty=info")))
        .init();

    let command = parse_args(std::env::args()).map_err(|e| eyre!("{}\n\n{}", e, USAGE))?;
    run_cli_command(command)
}
