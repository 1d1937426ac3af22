use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use govex::HtmlEmitter;
use tracing::instrument;

use super::{Session, terminal::Colorize};

const DEFAULT_OUTPUT: &str = "index.html";

#[derive(Debug, clap::Args)]
pub struct Generate {
    /// Where to write the HTML document [default: index.html]
    #[arg(short, long, value_name = "FILE")]
    pub(super) output: Option<PathBuf>,
}

impl Generate {
    #[instrument(skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let output = self.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
        let model = session.load_model()?;
        let labels = session.config.labels();

        let document = HtmlEmitter::new(&labels, &session.config.pdf)
            .emit(&model, Local::now().naive_local())
            .context("failed to generate the document")?;

        std::fs::write(&output, document)
            .with_context(|| format!("failed to write {}", output.display()))?;

        let stats = model.stats();
        println!(
            "{} {}",
            "Generated".success(),
            output.display().to_string().info()
        );
        println!(
            "  {} principles, {} requirements",
            stats.principles, stats.requirements
        );
        if stats.principles == 0 {
            println!(
                "  {}",
                "The source contains no principles; the document is empty".warning()
            );
        }

        Ok(())
    }
}
