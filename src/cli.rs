use clap::{Parser, Subcommand};

/// csv-relay — relays one CSV file from a private GitHub repository
#[derive(Parser)]
#[command(name = "csv-relay", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the relay server
    Serve {
        /// Port to bind (overrides CSV_RELAY_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check agent availability and append the result to the CSV log
    Check {
        /// Keep running, re-checking on the configured interval
        #[arg(long)]
        watch: bool,
    },
}
