use anyhow::Context;
use env_logger::Env;
use mapscout::{
    configuration::get_configuration,
    services::{CsvSink, Droid},
    startup::run,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration()?;
    let rules = configuration.extraction_rules()?;
    let tasks = configuration.search.tasks();
    log::info!(
        "Running {} searches over {} cities",
        tasks.len(),
        configuration.search.cities.len()
    );

    let droid = Droid::launch(&configuration.browser)
        .await
        .context("Failed to start the browser session")?;
    let mut sink = CsvSink::new(&configuration.output.directory);

    let report = run(&droid, &mut sink, &tasks, &configuration.search, &rules).await;

    if let Err(e) = droid.quit().await {
        log::error!("Failed to close the browser session: {:?}", e);
    }

    log::info!(
        "Finished: {} searches completed, {} aborted, {} rows written, {} listings skipped",
        report.completed(),
        report.aborted(),
        report.rows(),
        report.skipped()
    );
    if report.aborted() == 0 {
        log::info!("All cities scraped successfully!");
    }

    Ok(())
}
