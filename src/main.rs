use clap::Parser;
use users_fetch::utils::{logger, validation::Validate};
use users_fetch::{app, CliConfig, HttpUserSource, LocalStorage, UserListHandler, UsersError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose, cli.log_json);

    tracing::info!("Starting users-fetch CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        tracing::error!("❌ Listing users failed: {} (Kind: {:?})", e, e.kind());
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    Ok(())
}

async fn run(cli: &CliConfig) -> Result<(), UsersError> {
    let config = cli.resolve()?;
    config.validate()?;

    let source = HttpUserSource::from_config(&config)?;
    let handler = UserListHandler::new(source);

    let view = handler.list_users(cli.limit.as_deref()).await?;
    tracing::info!("✅ Fetched {} users", view.users.len());

    match &config.output_path {
        Some(path) => {
            let storage = LocalStorage::new(".");
            app::save(&storage, path, &view, config.format).await?;
            tracing::info!("📁 Output saved to: {}", path);
        }
        None => println!("{}", app::render(&view, config.format)?),
    }

    Ok(())
}
