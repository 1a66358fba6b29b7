use crate::{
    cli::RunOptions,
    config::Config,
    display::{oled::OledConnector, session::DisplaySession},
    logger::Logger,
    Result,
};

mod lifecycle;
mod status_loop;

pub struct App {
    config: Config,
    logger: Logger,
}

impl App {
    pub fn new(config: Config) -> Self {
        let logger = Logger::new(config.log_level, config.log_file.clone());
        Self { config, logger }
    }

    pub fn from_options(opts: &RunOptions) -> Result<Self> {
        Ok(Self::new(Config::from_sources(opts)?))
    }

    /// Entry point for the daemon; returns only after a shutdown request.
    pub fn run(&self) -> Result<()> {
        let running = lifecycle::create_shutdown_flag()?;
        self.logger.info(format!(
            "oledstat {} starting (interval {}s, mount {})",
            env!("CARGO_PKG_VERSION"),
            self.config.update_secs,
            self.config.mount
        ));

        let connector = OledConnector::from_config(&self.config);
        let mut session = DisplaySession::new(connector, self.config.contrast);
        status_loop::run_status_loop(&mut session, &self.config, &self.logger, &running);

        lifecycle::render_shutdown(&mut session, &self.logger);
        self.logger.info("shutdown complete");
        Ok(())
    }
}
