//! CLI argument parsing using clap derive

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Filehead - browse and change a directory tree as a content repository
#[derive(Parser, Debug)]
#[command(name = "filehead")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Repository root (defaults to the configured root, then the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Configuration file (TOML, JSON or YAML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Act as this user for lock ownership
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show attributes of one item
    Stat {
        /// Item path relative to the root
        path: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List the items directly inside a folder
    Ls {
        /// Folder path relative to the root
        #[arg(default_value = "/")]
        path: String,

        /// Only list files
        #[arg(long, conflicts_with = "folders")]
        files: bool,

        /// Only list folders
        #[arg(long)]
        folders: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List everything beneath a folder
    Tree {
        /// Folder path relative to the root
        #[arg(default_value = "/")]
        path: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Write the content of a file to stdout
    Cat {
        /// File path relative to the root
        path: String,
    },

    /// Apply a patch manifest
    ///
    /// The manifest is a TOML file listing changes in order:
    ///
    ///   message = "publish docs"
    ///
    ///   [[change]]
    ///   op = "folder-add"
    ///   path = "docs"
    ///
    ///   [[change]]
    ///   op = "file-add"
    ///   path = "docs/index.md"
    ///   source = "build/index.md"
    ///
    /// Ops: file-add, file-modify, file-delete, folder-add, folder-delete.
    /// File ops take inline `content` or a `source` file relative to the manifest.
    Apply {
        /// Path to the manifest
        manifest: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Lock paths for the acting user
    Lock {
        /// Paths to lock
        #[arg(required = true)]
        paths: Vec<String>,

        /// Reason recorded with the lock
        #[arg(short, long, default_value = "")]
        message: String,
    },

    /// Release locks on paths
    Unlock {
        /// Paths to unlock
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// List locks held in the repository
    Locks {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   filehead completions bash > ~/.local/share/bash-completion/completions/filehead
    ///   filehead completions zsh > ~/.zfunc/_filehead
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
