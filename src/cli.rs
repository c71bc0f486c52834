use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Clone, Debug, Parser)]
pub struct YatubeArgs {
    /// Load configuration from a custom location. Defaults to: $XDG_CONFIG/yatube/config.yml
    #[arg(short, long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Print a config template
    ConfigTemplate,
    /// Create a config file. Defaults to: $XDG_CONFIG/yatube/config.yml
    ConfigInit {
        /// Create configuration at a custom location.
        #[arg(short, long = "config", value_name = "FILE")]
        config_path: Option<PathBuf>,
    },
    /// Apply pending database migrations and exit
    Migrate,
    /// Fill the database with generated demo users, groups, and posts
    Seed {
        /// How many posts to generate
        #[arg(long, default_value_t = 25)]
        posts: usize,
    },
}

#[derive(Clone, Debug, Parser)]
#[command(subcommand_negates_reqs(true))]
#[command(args_conflicts_with_subcommands(true))]
pub struct Cli {
    #[command(flatten)]
    pub args: YatubeArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}
