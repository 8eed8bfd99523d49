use crate::app;
use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "meetbrief")]
#[command(about = "Meeting transcript summarization service", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub serve: ServeArgs,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(ClapArgs, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Path to a TOML config file (default: ~/.config/meetbrief/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Address to bind (default: 0.0.0.0)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Port to listen on (default: 5000)
    #[arg(long, env = "PORT", global = true)]
    pub port: Option<u16>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Print version information
    Version,
    /// Print the effective configuration with secrets masked
    Config,
}

pub fn handle_config_command(args: &ServeArgs) -> Result<()> {
    let config = app::load_config(args)?;
    print!("{}", config.to_masked_toml()?);
    Ok(())
}
