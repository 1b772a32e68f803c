pub mod structs;
pub mod tags;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tagscope_common::config::DEFAULT_IGNORE;

#[derive(Parser)]
#[command(name = "tagscope")]
#[command(about = "Inspect the structs and field tags of a Go package.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Import path of the package (derived from go.mod when omitted)
    #[arg(long, global = true)]
    pub package_path: Option<String>,

    /// Also read the package's _test.go files
    #[arg(long, global = true)]
    pub tests: bool,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every struct declared in a package
    #[command(alias = "s")]
    Structs {
        /// Directory holding the package sources
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// Print the tag values of a struct, nested structs included
    #[command(alias = "t")]
    Tags {
        /// Directory holding the package sources
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Absolute path to the struct (e.g. example.com/pkg/name.StructName)
        #[arg(long = "struct")]
        struct_path: Option<String>,
        /// Key of tags to find
        #[arg(long)]
        key: Option<String>,
        /// Tag value that hides a field and everything below it
        #[arg(long, default_value = DEFAULT_IGNORE)]
        ignore: String,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
