use logogen::{config::Config, logger, server, LogoService};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_file = dotenv::dotenv();

    let config = Config::from_env()?;
    logger::init_with_config(logger::config_for(&config))?;

    match env_file {
        Ok(path) => log::info!("✅ Loaded {}", path.display()),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    let port = config.port_or_default();
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), port);
    logger::log_config_info(&config);

    let service = LogoService::from_config(&config).await?;
    server::run(service, port).await?;

    Ok(())
}
