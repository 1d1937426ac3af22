use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

mod config;
mod export;
mod generate;
mod inspect;
mod search;
mod terminal;

use anyhow::Context;
use clap::{ArgAction, CommandFactory, Parser, error::ErrorKind};
use config::ShowConfig;
use export::Export;
use generate::Generate;
use govex::{Config, GovernanceModel, Locale, ModelBuilder, storage};
use inspect::Inspect;
use search::Search;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The spreadsheet to read (.xlsx, .xlsm, .xlsb, .xls, .ods, .csv or .tsv)
    #[arg(short, long, global = true, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Language of the document and exports (overrides the configuration)
    #[arg(long, global = true)]
    locale: Option<Locale>,

    #[command(flatten)]
    generate: Generate,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    /// Parses the command line, rejecting a top-level `--output` given
    /// alongside a subcommand.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = Self::try_parse_from(args)?;

        if cli.command.is_some() && cli.generate.output.is_some() {
            return Err(Self::command().error(
                ErrorKind::ArgumentConflict,
                "'--output' before a subcommand writes nothing; pass it after the subcommand",
            ));
        }

        Ok(cli)
    }

    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(locale) = self.locale {
            config.locale = locale;
        }

        let session = Session {
            config,
            input: self.input,
        };

        self.command
            .unwrap_or(Command::Generate(self.generate))
            .run(&session)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Generate the interactive HTML document (default)
    Generate(Generate),

    /// Export a selection to Markdown or PDF
    ///
    /// Produces the same output as the export buttons of the generated
    /// document, for the principles and requirements given on the command
    /// line.
    Export(Export),

    /// Search the framework
    ///
    /// Matches principle names and requirement names and guidelines,
    /// case-insensitively.
    Search(Search),

    /// Show the parsed framework, its size and fingerprint
    Inspect(Inspect),

    /// Print the effective configuration as TOML
    Config(ShowConfig),
}

impl Command {
    fn run(self, session: &Session) -> anyhow::Result<()> {
        match self {
            Self::Generate(command) => command.run(session)?,
            Self::Export(command) => command.run(session)?,
            Self::Search(command) => command.run(session)?,
            Self::Inspect(command) => command.run(session)?,
            Self::Config(command) => command.run(session)?,
        }
        Ok(())
    }
}

/// The resolved global options shared by every command.
#[derive(Debug)]
pub struct Session {
    config: Config,
    input: Option<PathBuf>,
}

impl Session {
    fn input(&self) -> anyhow::Result<&Path> {
        self.input
            .as_deref()
            .context("no input file given (use --input <FILE>)")
    }

    /// Reads the input and builds the model.
    #[instrument(skip(self))]
    fn load_model(&self) -> anyhow::Result<GovernanceModel> {
        let input = self.input()?;
        let rows = storage::load_rows(input, &self.config.columns)
            .with_context(|| format!("failed to read {}", input.display()))?;
        Ok(ModelBuilder::new(self.config.ids).build(rows))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_csv(dir: &Path) -> PathBuf {
        let path = dir.join("framework.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(
            b"Principle,Requirement,Guidelines\n\
              P1: Quality.Ensures correctness,R1: Must validate,Validate on ingest\n\
              ,R2: Must log,Log every change\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn generate_is_the_default_command() {
        let cli = Cli::try_parse_from(["govx", "-i", "framework.xlsx"]).unwrap();

        assert!(cli.command.is_none());
        assert_eq!(cli.input.as_deref(), Some(Path::new("framework.xlsx")));
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli =
            Cli::try_parse_from(["govx", "inspect", "-i", "f.csv", "--locale", "es", "-vv"])
                .unwrap();

        assert_eq!(cli.locale, Some(Locale::Es));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Command::Inspect(_))));
    }

    #[test]
    fn output_before_subcommand_is_rejected() {
        let error =
            Cli::try_parse_args(["govx", "-i", "f.csv", "-o", "x.html", "export", "--all"])
                .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ArgumentConflict);

        let cli = Cli::try_parse_args(["govx", "-i", "f.csv", "export", "--all", "-o", "x.md"])
            .unwrap();
        assert!(matches!(cli.command, Some(Command::Export(_))));

        let cli = Cli::try_parse_args(["govx", "-i", "f.csv", "-o", "x.html"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.generate.output.as_deref(), Some(Path::new("x.html")));
    }

    #[test]
    fn rejects_unknown_locale() {
        assert!(Cli::try_parse_from(["govx", "-i", "f.csv", "--locale", "fr"]).is_err());
    }

    #[test]
    fn missing_input_is_an_error() {
        let session = Session {
            config: Config::default(),
            input: None,
        };

        let error = session.load_model().unwrap_err();
        assert!(error.to_string().contains("--input"));
    }

    #[test]
    fn nonexistent_input_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let session = Session {
            config: Config::default(),
            input: Some(tmp.path().join("missing.xlsx")),
        };

        let error = session.load_model().unwrap_err();
        assert!(format!("{error:#}").contains("does not exist"));
    }

    #[test]
    fn load_model_from_csv() {
        let tmp = tempfile::tempdir().unwrap();
        let session = Session {
            config: Config::default(),
            input: Some(write_csv(tmp.path())),
        };

        let model = session.load_model().unwrap();

        assert_eq!(model.principles().len(), 1);
        assert_eq!(model.principles()[0].id().as_str(), "p_p1");
        assert_eq!(model.principles()[0].requirements().len(), 2);
    }
}
