//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for linker using clap's derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::utils::export::ExportFormat;
use crate::utils::helpers::FilterType;

/// linker - dashboard and scripting client for the Linker API
#[derive(Parser, Debug)]
#[command(name = "linker")]
#[command(version)]
#[command(about = "Manage short links, files and API tokens on a Linker server", long_about = None)]
pub struct Cli {
    /// API server URL (remembered for later runs)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: ./config.toml when present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the terminal dashboard (default)
    #[cfg(feature = "tui")]
    Tui,

    /// Sign in and store the session
    Login {
        username: String,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account and sign in
    Register {
        username: String,
        email: String,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Manage short links
    Links {
        #[command(subcommand)]
        action: LinkCommands,
    },

    /// Manage uploaded files
    Files {
        #[command(subcommand)]
        action: FileCommands,
    },

    /// Manage API tokens
    Tokens {
        #[command(subcommand)]
        action: TokenCommands,
    },

    /// Show analytics (overview, or one link / file)
    Analytics {
        /// Link ID
        #[arg(long, conflicts_with = "file")]
        link: Option<String>,

        /// File ID
        #[arg(long)]
        file: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Shared list options
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Case-insensitive search over title, description, URL and short codes
    #[arg(long)]
    pub search: Option<String>,

    /// all | active | expired | public | private
    #[arg(long, default_value = "all")]
    pub filter: FilterType,

    /// Print raw JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum LinkCommands {
    /// List links
    List(ListArgs),

    /// Create a short link
    Create {
        /// Target URL
        url: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Comma separated custom short codes
        #[arg(long)]
        codes: Option<String>,

        /// Expiration (RFC3339, YYYY-MM-DDTHH:MM in UTC, or relative like 7d)
        #[arg(long)]
        expires: Option<String>,

        /// Disable click analytics
        #[arg(long)]
        no_analytics: bool,
    },

    /// Update a link
    Update {
        id: String,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        expires: Option<String>,
    },

    /// Delete a link
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Export links to a file
    Export {
        path: PathBuf,

        /// csv | json | html
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
    },
}

#[derive(Subcommand, Debug)]
pub enum FileCommands {
    /// List files
    List(ListArgs),

    /// Upload a file
    Upload {
        path: PathBuf,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Comma separated custom short codes
        #[arg(long)]
        codes: Option<String>,

        /// Hide the file from anonymous downloads
        #[arg(long)]
        private: bool,

        /// Download password
        #[arg(long)]
        password: Option<String>,

        /// Disable download analytics
        #[arg(long)]
        no_analytics: bool,
    },

    /// Update a file's metadata
    Update {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        expires: Option<String>,

        /// Make the file public
        #[arg(long, conflicts_with = "private")]
        public: bool,

        /// Make the file private
        #[arg(long)]
        private: bool,
    },

    /// Delete a file
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TokenCommands {
    /// List API tokens
    List {
        #[arg(long)]
        json: bool,
    },

    /// Create an API token (shown once)
    Create {
        name: String,

        #[arg(long)]
        expires: Option<String>,
    },

    /// Revoke an API token
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
