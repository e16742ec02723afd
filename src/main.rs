use clap::Parser;
use hh_vacancies::cli::{self, CliArgs};
use hh_vacancies::config::{get_config, init_config};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    init_config()?;
    let config = get_config();

    let mut stdout = std::io::stdout();
    match args.command {
        Some(action) => cli::run_action(config, &action, &mut stdout).await?,
        None => cli::interactive(config, &mut stdout).await?,
    }

    Ok(())
}
