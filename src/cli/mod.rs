//! Command-line interface for the movie gallery.
//!
//! `serve` runs the web server; the remaining commands administer the
//! database directly.

mod commands;

use clap::{Parser, Subcommand};

use crate::domain::Role;

/// Movie gallery server with role-gated catalog editing and voting
#[derive(Parser)]
#[command(name = "moviegallery")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (default)
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// List accounts and their roles
    Accounts,

    /// Grant a role to an account
    GrantRole {
        /// Account username
        username: String,
        /// Viewer, "Content Editor" or "Marketing Manager"
        role: Role,
    },

    /// Revoke a role from an account
    RevokeRole {
        /// Account username
        username: String,
        /// Role to remove; the last role cannot be removed
        role: Role,
    },

    /// List movies with their vote counters
    #[command(alias = "ls")]
    Movies,

    /// Add a movie to the catalog
    AddMovie {
        #[arg(long)]
        title: String,
        #[arg(long)]
        video_url: String,
        #[arg(long)]
        image_path: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        genre: String,
    },
}

pub use commands::*;
