use std::path::PathBuf;

use anyhow::Context;
use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dsc_notebook::config::Settings;
use dsc_notebook::query::{write_query_notebook, QueryOptions};
use dsc_notebook::summary::{write_summary_notebook, SummaryOptions};
use dsc_notebook::writer::{Executor, NbconvertExecutor};

#[derive(Parser)]
#[command(name = "dsc-notebook")]
#[command(about = "Generate Jupyter notebooks summarizing DSC results")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    summary: SummaryArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a notebook previewing query results
    Query {
        /// Workbook holding one sheet per query
        source: PathBuf,
        /// Notebook to write
        output: PathBuf,

        /// Query text, repeat for several queries
        #[arg(short, long = "query")]
        queries: Vec<String>,

        /// Kernel to switch to after the previews (e.g. R, Python3)
        #[arg(long)]
        language: Option<String>,

        /// Script inlined after the language switch, repeatable
        #[arg(long = "addon")]
        addons: Vec<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

/// Summarize a result store (the default command).
#[derive(Args)]
struct SummaryArgs {
    /// Result store to summarize
    source: Option<PathBuf>,
    /// Notebook to write
    output: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct CommonArgs {
    /// Notebook title
    #[arg(short, long)]
    title: Option<String>,

    /// Paragraph shown under the title, repeatable
    #[arg(short, long = "description")]
    description: Vec<String>,

    /// Preview row limit, negative for no limit
    #[arg(short, long, allow_negative_numbers = true)]
    limit: Option<i64>,

    /// Execute the notebook before writing it
    #[arg(short = 'x', long, overrides_with = "no_execute")]
    execute: bool,

    /// Write the notebook unexecuted, even if the config enables execution
    #[arg(long, overrides_with = "execute")]
    no_execute: bool,
}

impl CommonArgs {
    fn description(&self, settings: &Settings) -> Vec<String> {
        if self.description.is_empty() {
            settings.description.clone()
        } else {
            self.description.clone()
        }
    }

    /// The last of `--execute`/`--no-execute` wins, otherwise the config decides.
    fn execute(&self, settings: &Settings) -> bool {
        if self.no_execute {
            false
        } else {
            self.execute || settings.execute
        }
    }
}

/// Initialize tracing on stderr so stdout stays free for piping.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "dsc_notebook=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let settings = Settings::load();

    match cli.command {
        Some(Commands::Query {
            source,
            output,
            queries,
            language,
            addons,
            common,
        }) => {
            let options = QueryOptions {
                title: common
                    .title
                    .clone()
                    .unwrap_or_else(|| settings.query_title.clone()),
                description: common.description(&settings),
                language,
                addons,
                limit: common.limit.unwrap_or(settings.limit),
            };
            let executor = build_executor(&settings, common.execute(&settings));

            write_query_notebook(&source, &queries, &output, &options, executor.as_deref())
                .with_context(|| {
                    format!("Failed to build query notebook for {}", source.display())
                })?;
        }
        None => {
            let SummaryArgs {
                source,
                output,
                common,
            } = cli.summary;
            let (Some(source), Some(output)) = (source, output) else {
                Cli::command()
                    .error(
                        ErrorKind::MissingRequiredArgument,
                        "both <SOURCE> and <OUTPUT> are required",
                    )
                    .exit();
            };

            let options = SummaryOptions {
                title: common
                    .title
                    .clone()
                    .unwrap_or_else(|| settings.summary_title.clone()),
                description: common.description(&settings),
                limit: common.limit.unwrap_or(settings.limit),
            };
            let executor = build_executor(&settings, common.execute(&settings));

            write_summary_notebook(&source, &output, &options, executor.as_deref())
                .with_context(|| format!("Failed to summarize {}", source.display()))?;
        }
    }

    Ok(())
}

fn build_executor(settings: &Settings, execute: bool) -> Option<Box<dyn Executor>> {
    if execute {
        Some(Box::new(NbconvertExecutor::new(settings.jupyter.clone())))
    } else {
        None
    }
}
