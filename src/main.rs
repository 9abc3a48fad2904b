fn main() -> anyhow::Result<()> {
    let _log_guard = match podbox::logging::init_logging() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {e}");
            None
        }
    };

    let config = podbox::AppConfig::load()?;
    podbox::app_core::Podbox::new(config)?.run()?;
    Ok(())
}
