use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "uno-ballot")]
#[command(about = "UNO voting ballot: one vote per 8-digit UNO ID")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding the tally and voter files
    #[arg(long)]
    pub data_dir: Option<String>,

    #[arg(long)]
    pub tally_file: Option<String>,

    #[arg(long)]
    pub voters_file: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Cast a single vote
    Vote {
        #[arg(long)]
        candidate: String,

        /// 8-digit UNO ID
        #[arg(long)]
        id: String,
    },
    /// Show current vote counts
    Tally {
        #[arg(long)]
        json: bool,
    },
    /// Compare the tally file against the voter record
    Audit,
    /// Prompt for ballots on stdin until EOF or `quit`
    Interactive,
}
