//! Bramble CLI
//!
//! Parse selectors and run them against trees described as JSON.

mod report;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use bramble_dom::{MarkupTree, NodeId};
use bramble_select::{Selector, parse_selector, query_all_selectors, query_selectors};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use report::Reporter;

/// Bramble: CSS-like selectors over markup trees
#[derive(Parser, Debug)]
#[command(name = "bramble")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Show how a selector list is read
    bramble parse "div.shower.ball a.embeded, h1#header"

    # First match in a tree file
    bramble query "section#menu" page.json

    # Every match, as JSON
    bramble query --all --json "section.section" page.json

    # Inline tree
    bramble query "a[rel=next]" --tree-json '{"tag": "a", "attributes": {"rel": "next"}}'
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log parser and matcher activity (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a selector and print its structure
    Parse {
        /// Selector list to parse
        selector: String,

        /// Print the syntax tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a selector against a tree
    Query {
        /// Selector list to match
        selector: String,

        #[command(flatten)]
        tree: TreeSource,

        /// Report every match instead of the first
        #[arg(short, long)]
        all: bool,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the outline of a tree
    Tree {
        #[command(flatten)]
        tree: TreeSource,
    },
}

/// Where the tree description comes from.
#[derive(Args, Debug)]
struct TreeSource {
    /// Path to a JSON tree description
    #[arg(value_name = "TREE.json", required_unless_present = "tree_json")]
    path: Option<PathBuf>,

    /// Inline JSON tree description instead of a file
    #[arg(long, value_name = "JSON", conflicts_with = "path")]
    tree_json: Option<String>,
}

impl TreeSource {
    fn load(&self) -> Result<MarkupTree> {
        let json = match (&self.tree_json, &self.path) {
            (Some(inline), _) => inline.clone(),
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
            (None, None) => anyhow::bail!("a tree file or --tree-json is required"),
        };
        let tree = MarkupTree::from_json(&json).context("failed to load tree")?;
        tracing::debug!(nodes = tree.len(), "loaded tree");
        Ok(tree)
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let reporter = Reporter::new(!cli.no_color);

    match cli.command {
        Command::Parse { selector, json } => {
            let Some(selectors) = parse_or_report(&reporter, &selector) else {
                return Ok(ExitCode::from(2));
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&selectors)?);
            } else {
                reporter.print_selectors(&selectors);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Query {
            selector,
            tree,
            all,
            json,
        } => {
            let tree = tree.load()?;
            let Some(selectors) = parse_or_report(&reporter, &selector) else {
                return Ok(ExitCode::from(2));
            };
            let found = if all {
                query_all_selectors(&tree, NodeId::ROOT, &selectors)
            } else {
                query_selectors(&tree, NodeId::ROOT, &selectors)
                    .into_iter()
                    .collect()
            };
            if json {
                let specs: Vec<_> = found.iter().flat_map(|&id| tree.to_specs(id)).collect();
                println!("{}", serde_json::to_string_pretty(&specs)?);
            } else {
                reporter.print_matches(&tree, &found)?;
            }
            Ok(if found.is_empty() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::Tree { tree } => {
            let tree = tree.load()?;
            reporter.print_tree(&tree)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Parse `selector`, printing a located error on failure.
fn parse_or_report(reporter: &Reporter, selector: &str) -> Option<Vec<Selector>> {
    match parse_selector(selector) {
        Ok(selectors) => Some(selectors),
        Err(err) => {
            reporter.print_parse_error(selector, &err);
            None
        }
    }
}

/// Install the `tracing` subscriber; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
