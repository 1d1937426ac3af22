use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use govex::{ExportFormat, NodeId, Selection, export};
use tracing::instrument;

use super::{Session, terminal::Colorize};

/// Parse a node id, accepting any case.
fn parse_node_id(s: &str) -> Result<NodeId, String> {
    s.trim().to_lowercase().parse().map_err(|e| format!("{e}"))
}

#[derive(Debug, clap::Args)]
pub struct Export {
    /// Principles and requirements to check (comma-separated ids, e.g.
    /// `p_p1,r_r4`). Checking a principle checks all of its requirements.
    #[arg(
        short,
        long,
        value_delimiter = ',',
        value_name = "ID",
        value_parser = parse_node_id,
        required_unless_present = "all"
    )]
    select: Vec<NodeId>,

    /// Check every requirement
    #[arg(long, conflicts_with = "select")]
    all: bool,

    /// Export format
    #[arg(short, long, value_enum, default_value_t)]
    format: ExportFormat,

    /// Where to write the export (defaults to the locale's export file name)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl Export {
    #[instrument(skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let model = session.load_model()?;
        let labels = session.config.labels();
        let format = self.format;

        let mut selection = if self.all {
            Selection::all(&model)
        } else {
            Selection::new(&model)
        };
        for id in &self.select {
            selection.select(id)?;
        }

        let bytes = export::export(
            &selection,
            &labels,
            &session.config.pdf,
            format,
            Local::now().naive_local(),
        )
        .with_context(|| format!("failed to export {format}"))?;

        let output = self
            .output
            .unwrap_or_else(|| PathBuf::from(format.file_name(&labels)));
        std::fs::write(&output, bytes)
            .with_context(|| format!("failed to write {}", output.display()))?;

        let included = selection.included().count();
        println!(
            "{} {}",
            "Exported".success(),
            output.display().to_string().info()
        );
        if included == 0 {
            println!("  {}", labels.nothing_selected.warning());
        } else {
            println!("  {included} principles included");
        }

        Ok(())
    }
}
