use anyhow::Context;
use tracing::instrument;

use super::{Session, terminal::Colorize};

#[derive(Debug, clap::Args)]
pub struct ShowConfig {}

impl ShowConfig {
    #[instrument(skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let toml = session
            .config
            .to_toml()
            .context("failed to render configuration")?;

        println!("{}", "# Effective configuration".dim());
        print!("{toml}");
        Ok(())
    }
}
