use clap::Parser as _;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt as _};
use yatube::cli::{Cli, Command};
use yatube::config::{self, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,tower_http=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::ConfigTemplate) => {
            config::print_config_template();
            Ok(())
        }
        Some(Command::ConfigInit { config_path }) => {
            config::init_config(config_path)?;
            Ok(())
        }
        Some(Command::Migrate) => {
            let config = Config::load(cli.args.config_path)?;
            yatube::run_migrations(&config.database_url()?).await
        }
        Some(Command::Seed { posts }) => {
            let config = Config::load(cli.args.config_path)?;
            yatube::run_migrations(&config.database_url()?).await?;
            let context = yatube::create_context(config).await?;
            yatube::seed::seed(&context, posts).await
        }
        None => {
            let config = Config::load(cli.args.config_path)?;
            yatube::run_migrations(&config.database_url()?).await?;
            let context = yatube::create_context(config).await?;
            yatube::serve(context).await
        }
    }
}
