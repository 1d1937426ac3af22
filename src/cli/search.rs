use anyhow::Context;
use clap::ValueEnum;
use govex::domain::search::{Highlighter, SearchOutcome, search};
use tracing::instrument;

use super::{
    Session,
    terminal::{Colorize, highlight},
};

#[derive(Debug, clap::Args)]
pub struct Search {
    /// Text to look for (case-insensitive)
    query: String,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Search {
    #[instrument(skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let model = session.load_model()?;
        let outcome = search(&model, &self.query);

        if self.output == OutputFormat::Json {
            let hits: &[_] = match &outcome {
                SearchOutcome::Filtered(hits) => hits.as_slice(),
                SearchOutcome::ShowAll | SearchOutcome::NoResults => &[],
            };
            serde_json::to_writer_pretty(std::io::stdout(), hits)
                .context("failed to render json output")?;
            println!();
            return Ok(());
        }

        match outcome {
            SearchOutcome::ShowAll => {
                println!("{}", "Empty query: every principle is shown".dim());
            }
            SearchOutcome::NoResults => {
                println!("{}", session.config.labels().no_results.warning());
            }
            SearchOutcome::Filtered(hits) => {
                let highlighter = Highlighter::new(&self.query);
                let mark = |text: &str| highlight(text, &highlighter.ranges(text));

                for hit in &hits {
                    println!(
                        "{} {}",
                        hit.principle.id().as_str().dim(),
                        mark(hit.principle.name())
                    );
                    for requirement in &hit.requirements {
                        let node = requirement.requirement;
                        println!("  {} {}", node.id().as_str().dim(), mark(node.name()));
                        if requirement.matched {
                            for line in node.guidelines().lines().filter(|line| {
                                !highlighter.ranges(line).is_empty()
                            }) {
                                println!("      {}", mark(line.trim()));
                            }
                        }
                    }
                }

                let requirements: usize = hits
                    .iter()
                    .map(|hit| hit.requirements.iter().filter(|r| r.matched).count())
                    .sum();
                println!();
                println!(
                    "{}",
                    format!(
                        "{} principles shown, {requirements} matching requirements",
                        hits.len()
                    )
                    .info()
                );
            }
        }

        Ok(())
    }
}
