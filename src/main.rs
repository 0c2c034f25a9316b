// src/main.rs
mod config;
mod file_utils;
mod list;
mod models;
mod project;
mod query;
mod time_format;
mod yaml_parser;

use anyhow::Result;
use clap::Parser;
use config::load_config;
use list::{Format, list_experiments};
use project::Project;
use query::{Filters, Sorter};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// 列出仓库中记录的实验
#[derive(Parser, Debug)]
#[command(name = "exp-list", version, about = "List experiments recorded in a local repository")]
struct Cli {
    /// Print the full experiment list as JSON
    #[arg(long, conflicts_with = "quiet")]
    json: bool,

    /// Only print experiment IDs
    #[arg(short, long)]
    quiet: bool,

    /// Show all params, not just the ones that differ between experiments
    #[arg(short, long)]
    all: bool,

    /// Filter experiments, e.g. "step>=100" or "status=running" (repeatable)
    #[arg(short = 'f', long = "filter", value_name = "EXPR")]
    filters: Vec<String>,

    /// Sort key, append "-desc" for descending order
    #[arg(short, long, value_name = "KEY")]
    sort: Option<String>,

    /// Path to the tool configuration file
    #[arg(short, long, value_name = "PATH", default_value = "exp_list.toml")]
    config: PathBuf,

    /// Project directory containing replicate.yaml
    #[arg(short = 'D', long = "source-directory", value_name = "DIR")]
    source_directory: Option<PathBuf>,
}

impl Cli {
    fn format(&self) -> Format {
        if self.json {
            Format::Json
        } else if self.quiet {
            Format::Quiet
        } else {
            Format::Table
        }
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    // 加载配置文件
    let config = load_config(&cli.config)?;
    let project = Project::open(&config, cli.source_directory.as_deref())?;
    debug!("Listing experiments in {}", project.repository_dir().display());

    let filters = Filters::parse(&cli.filters)?;
    let sorter = Sorter::parse(cli.sort.as_deref().unwrap_or(&config.list.sort))?;
    let all_params = cli.all || config.list.all_params;

    list_experiments(&project, cli.format(), all_params, &filters, &sorter)
}

// 日志输出到 stderr，默认只显示警告，可通过 RUST_LOG 调整
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_format_flags() {
        let cli = Cli::try_parse_from(["exp-list", "--json"]).unwrap();
        assert_eq!(cli.format(), Format::Json);

        let cli = Cli::try_parse_from(["exp-list", "-q"]).unwrap();
        assert_eq!(cli.format(), Format::Quiet);

        let cli = Cli::try_parse_from(["exp-list"]).unwrap();
        assert_eq!(cli.format(), Format::Table);

        assert!(Cli::try_parse_from(["exp-list", "--json", "--quiet"]).is_err());
    }

    #[test]
    fn test_cli_filters_and_sort() {
        let cli = Cli::try_parse_from([
            "exp-list", "-f", "step>=10", "--filter", "status=running", "-s", "step-desc", "-a",
        ])
        .unwrap();
        assert_eq!(cli.filters, vec!["step>=10", "status=running"]);
        assert_eq!(cli.sort.as_deref(), Some("step-desc"));
        assert!(cli.all);
        assert_eq!(cli.config, PathBuf::from("exp_list.toml"));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
