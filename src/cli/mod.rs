//! CLI module for the forum services
//!
//! - `serve <users|threads|posts>`: run one HTTP service
//! - `migrate`: copy JSON fixtures into the DynamoDB tables

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Forum microservices over JSON fixtures or DynamoDB
#[derive(Parser)]
#[command(name = "forum-services")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP service for one collection
    Serve(serve::ServeArgs),

    /// Migrate fixture files into DynamoDB tables
    Migrate(migrate::MigrateArgs),
}
