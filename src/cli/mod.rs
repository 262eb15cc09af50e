pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "jobly")]
#[command(about = "Jobly CLI - database setup and token tooling for the Jobly API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Database schema and sample data")]
    Db {
        #[command(subcommand)]
        cmd: commands::db::DbCommands,
    },

    #[command(about = "Mint a JWT signed with the configured secret")]
    Token(commands::token::TokenArgs),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Db { cmd } => commands::db::handle(cmd, output_format).await,
        Commands::Token(args) => commands::token::handle(args, output_format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_db_init_with_seed() {
        let cli = Cli::try_parse_from(["jobly", "--json", "db", "init", "--seed"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Db {
                cmd: commands::db::DbCommands::Init { seed: true }
            }
        ));
    }

    #[test]
    fn parses_token_flags() {
        let cli = Cli::try_parse_from(["jobly", "token", "admin", "--admin"]).unwrap();
        match cli.command {
            Commands::Token(args) => {
                assert_eq!(args.username, "admin");
                assert!(args.admin);
            }
            _ => panic!("expected token command"),
        }
        assert!(matches!(OutputFormat::from_cli(&Cli::try_parse_from(["jobly", "token", "u1"]).unwrap()), OutputFormat::Text));
    }
}
