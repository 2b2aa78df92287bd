use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "maps-harvest")]
#[command(about = "Extracts business listings from a map search result list")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search, walk the result list and export every business found
    Scrape {
        /// Search query, e.g. "cafes in vadodara"
        query: String,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file (defaults to businesses.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// WebDriver server URL
        #[arg(long)]
        webdriver_url: Option<String>,

        /// Run the browser without a window
        #[arg(long)]
        headless: bool,
    },

    /// Remove duplicate businesses from an exported file
    Dedupe {
        /// Previously exported JSON file
        file: PathBuf,
    },
}
