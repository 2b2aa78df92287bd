use clap::Parser;
use maps_harvest::{Harvest, HarvestError, output};
use std::process::ExitCode;

mod args;
use args::{Args, Command};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let result = match args.command {
        Command::Scrape {
            query,
            config,
            output,
            webdriver_url,
            headless,
        } => scrape(query, config, output, webdriver_url, headless).await,
        Command::Dedupe { file } => output::dedupe_file(&file).map(|report| {
            println!(
                "Total entries before processing: {}\nTotal unique entries after processing: {}",
                report.before, report.after
            );
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ::log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn scrape(
    query: String,
    config: Option<std::path::PathBuf>,
    output: Option<std::path::PathBuf>,
    webdriver_url: Option<String>,
    headless: bool,
) -> Result<(), HarvestError> {
    let mut harvest = Harvest::new(&query);
    if let Some(path) = config {
        harvest = harvest.with_config_file(path)?;
    }
    if let Some(path) = output {
        harvest = harvest.with_output(path);
    }
    if let Some(url) = webdriver_url {
        harvest = harvest.with_webdriver_url(&url);
    }
    if headless {
        harvest = harvest.with_headless(true);
    }

    println!("Note: scraping requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
    );

    let start_time = std::time::Instant::now();
    let report = harvest.run().await?;

    ::log::info!(
        "Scraping complete - {} businesses in {:.2} seconds",
        report.records,
        start_time.elapsed().as_secs_f64()
    );
    if report.interrupted {
        println!("Scraping interrupted, keeping the businesses collected so far");
    }
    if let Some(path) = report.written_to {
        println!("Exported {} businesses to {}", report.records, path.display());
    }
    Ok(())
}
