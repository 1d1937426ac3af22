use anyhow::Context;
use clap::ValueEnum;
use govex::GovernanceModel;
use serde::Serialize;
use tracing::instrument;

use super::{Session, terminal::Colorize};

#[derive(Debug, clap::Args)]
pub struct Inspect {
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Tree,
    Json,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    fingerprint: String,
    stats: govex::domain::model::Stats,
    principles: &'a GovernanceModel,
}

impl Inspect {
    #[instrument(skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let model = session.load_model()?;

        match self.output {
            OutputFormat::Json => {
                let report = Report {
                    fingerprint: model.fingerprint(),
                    stats: model.stats(),
                    principles: &model,
                };
                serde_json::to_writer_pretty(std::io::stdout(), &report)
                    .context("failed to render json output")?;
                println!();
            }
            OutputFormat::Tree => print!("{}", render_tree(&model)),
        }

        Ok(())
    }
}

fn render_tree(model: &GovernanceModel) -> String {
    let mut out = String::new();

    for principle in model {
        out.push_str(&format!(
            "{} {}\n",
            principle.id().as_str().info(),
            principle.name()
        ));

        let count = principle.requirements().len();
        for (index, requirement) in principle.requirements().iter().enumerate() {
            let branch = if index + 1 == count { "└─" } else { "├─" };
            out.push_str(&format!(
                "  {branch} {} {}\n",
                requirement.id().as_str().dim(),
                requirement.name()
            ));
        }
    }

    let stats = model.stats();
    out.push('\n');
    out.push_str(&format!(
        "{} principles, {} requirements\n",
        stats.principles, stats.requirements
    ));
    out.push_str(&format!("fingerprint {}\n", model.fingerprint().dim()));
    out
}
