mod config;
mod config_cmd;
mod ocr_cmd;
mod process_cmd;
mod terminal_output;
mod tools_cmd;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use fileedit_core::ToolCategory;

#[derive(Parser)]
#[command(name = "fileedit")]
#[command(about = "FileEdit: batch document processing from the terminal")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.fileedit/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available tools
    Tools {
        /// Only show one category (pdf, office, conversion)
        #[arg(short, long)]
        category: Option<ToolCategory>,
    },
    /// Upload and process a batch of files
    Process {
        /// Files to process
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Tool to run (see `fileedit tools`)
        #[arg(short, long)]
        tool: Option<String>,
        /// Filter the printed history by file name or action
        #[arg(short, long)]
        query: Option<String>,
        /// Start the history with the sample entries
        #[arg(long)]
        seed_history: bool,
    },
    /// Extract text from an image with the configured AI provider
    Ocr {
        image: PathBuf,
        /// Also summarize the extracted text
        #[arg(short, long)]
        summarize: bool,
    },
    /// Show the effective configuration (secrets masked)
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref()).await?;

    fileedit_logging::init_logger(config.log_dir().map(Path::new), config.log_level());
    info!(version = env!("CARGO_PKG_VERSION"), "FileEdit starting");

    match cli.command {
        Commands::Tools { category } => tools_cmd::run(category)?,
        Commands::Process {
            paths,
            tool,
            query,
            seed_history,
        } => {
            process_cmd::run(
                &config,
                process_cmd::ProcessArgs {
                    paths: &paths,
                    tool: tool.as_deref(),
                    query: query.as_deref(),
                    seed_history,
                },
            )
            .await?
        }
        Commands::Ocr { image, summarize } => ocr_cmd::run(&config, &image, summarize).await?,
        Commands::Config => config_cmd::run(&config)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_process_with_tool() {
        let cli = Cli::try_parse_from([
            "fileedit", "--config", "/tmp/c.yaml", "process", "a.pdf", "b.pdf", "--tool", "compress-pdf",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/c.yaml")));
        match cli.command {
            Commands::Process { paths, tool, .. } => {
                assert_eq!(paths.len(), 2);
                assert_eq!(tool.as_deref(), Some("compress-pdf"));
            }
            _ => panic!("expected process"),
        }
    }

    #[test]
    fn parses_category_case_insensitively() {
        let cli = Cli::try_parse_from(["fileedit", "tools", "--category", "office"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Tools { category: Some(ToolCategory::Office) }
        ));
    }

    #[test]
    fn process_requires_paths() {
        assert!(Cli::try_parse_from(["fileedit", "process"]).is_err());
    }
}
