//! arbor command line interface.

use anyhow::{bail, Result};
use arbor::config::Settings;
use arbor::dag::SledDagStore;
use arbor::ignore::IgnoreSet;
use arbor::ingest;
use arbor::logging;
use arbor::repo::{Repository, DEFAULT_BRANCH};
use arbor::resolve::{self, Resolved};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "arbor",
    about = "Content-addressed filesystem versioning",
    version
)]
struct Cli {
    /// Path to a config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a local tree and bind a branch to the new root.
    Add {
        path: PathBuf,
        /// Branch to update.
        #[arg(long, default_value = DEFAULT_BRANCH)]
        branch: String,
        /// Glob patterns to exclude (repeatable).
        #[arg(long = "ignore")]
        ignore: Vec<String>,
    },
    /// Print a file's content from a branch.
    Cat {
        path: String,
        #[arg(long)]
        branch: Option<String>,
    },
    /// List a directory from a branch.
    Ls {
        #[arg(default_value = "")]
        path: String,
        #[arg(long)]
        branch: Option<String>,
        /// Emit the listing as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show branches and their root ids.
    Branch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    logging::init(&settings.log_level)?;

    let store = SledDagStore::open(settings.blocks_path())?;
    let repo = Repository::load(&settings.repo_state_path(), &settings.repository)?;

    match cli.command {
        Command::Add {
            path,
            branch,
            ignore,
        } => {
            let ignore_set = if ignore.is_empty() {
                None
            } else {
                Some(IgnoreSet::new(&ignore)?)
            };
            let root = ingest::add(&store, &path, ignore_set.as_ref())?;
            repo.set_branch(&branch, root);
            repo.save(&settings.repo_state_path())?;
            println!("{}", root);
        }
        Command::Cat { path, branch } => {
            let root = repo.resolve_branch(branch.as_deref())?;
            let segments = split_path(&path);
            match resolve::resolve(&store, root, &segments).await? {
                Resolved::Blob(data) => std::io::stdout().write_all(&data)?,
                Resolved::Tree(_) => bail!("{} is a directory", path),
            }
        }
        Command::Ls { path, branch, json } => {
            let root = repo.resolve_branch(branch.as_deref())?;
            let segments = split_path(&path);
            match resolve::resolve(&store, root, &segments).await? {
                Resolved::Tree(entries) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&entries)?);
                    } else {
                        for entry in &entries {
                            println!("{}\t{}\t{}", entry.id, entry.size, entry.name);
                        }
                    }
                }
                Resolved::Blob(_) => bail!("{} is not a directory", path),
            }
        }
        Command::Branch => {
            for (name, id) in repo.branches() {
                println!("{}\t{}", name, id);
            }
        }
    }

    Ok(())
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
