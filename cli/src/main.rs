mod commands;
mod terminal;

use commands::{CommandLine, Commands, structs, tags};
use tagscope_common::config::{LoaderConfig, TagsConfig};
use terminal::logging;

fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init(commands.verbose);

    let cfg = LoaderConfig {
        package_path: commands.package_path,
        include_tests: commands.tests,
    };

    match commands.command {
        Commands::Structs { dir } => structs::structs(&dir, &cfg),
        Commands::Tags {
            dir,
            struct_path,
            key,
            ignore,
        } => {
            let tags_cfg = TagsConfig::new(
                struct_path.unwrap_or_default(),
                key.unwrap_or_default(),
                Some(ignore),
            )?;
            tags::tags(&dir, &cfg, &tags_cfg)
        }
    }
}
