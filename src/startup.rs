use itertools::Itertools;
use tokio::time;

use crate::{
    configuration::SearchSettings,
    domain::{
        extract::{extract_record, ExtractionRules},
        listing::{BusinessRecord, ListingCapture},
        task::Task,
    },
    services::{run_search, RecordSink, SearchSurface, SurfaceError},
};

#[derive(Debug)]
pub enum ListingOutcome {
    Written(BusinessRecord),
    Skipped(String),
}

#[derive(Debug)]
pub enum TaskOutcome {
    Completed { rows: usize, skipped: usize },
    Aborted(anyhow::Error),
}

#[derive(Debug)]
pub struct TaskReport {
    pub task: Task,
    pub outcome: TaskOutcome,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub tasks: Vec<TaskReport>,
}

impl RunReport {
    pub fn completed(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| matches!(t.outcome, TaskOutcome::Completed { .. }))
            .count()
    }

    pub fn aborted(&self) -> usize {
        self.tasks.len() - self.completed()
    }

    pub fn rows(&self) -> usize {
        self.tasks
            .iter()
            .map(|t| match t.outcome {
                TaskOutcome::Completed { rows, .. } => rows,
                TaskOutcome::Aborted(_) => 0,
            })
            .sum()
    }

    pub fn skipped(&self) -> usize {
        self.tasks
            .iter()
            .map(|t| match t.outcome {
                TaskOutcome::Completed { skipped, .. } => skipped,
                TaskOutcome::Aborted(_) => 0,
            })
            .sum()
    }
}

/// Runs every task in order. Consecutive tasks of one city share an output.
/// Nothing below this loop can stop it: failed tasks are reported and skipped.
pub async fn run<S, W>(
    surface: &S,
    sink: &mut W,
    tasks: &[Task],
    settings: &SearchSettings,
    rules: &ExtractionRules,
) -> RunReport
where
    S: SearchSurface + ?Sized,
    W: RecordSink + ?Sized,
{
    let mut report = RunReport::default();

    let cities: Vec<(String, Vec<&Task>)> = tasks
        .iter()
        .chunk_by(|task| task.city.clone())
        .into_iter()
        .map(|(city, city_tasks)| (city, city_tasks.collect()))
        .collect();

    for (city, city_tasks) in cities {
        log::info!("Scraping city: {}", city);

        if let Err(e) = sink.start_city(&city) {
            log::error!("Skipping {}, no output available: {:?}", city, e);
            for task in city_tasks {
                report.tasks.push(TaskReport {
                    task: task.clone(),
                    outcome: TaskOutcome::Aborted(anyhow::anyhow!(
                        "output for {} unavailable: {:#}",
                        city,
                        e
                    )),
                });
            }
            continue;
        }

        for task in city_tasks {
            let outcome = run_task(surface, sink, task, settings, rules).await;
            match &outcome {
                TaskOutcome::Completed { rows, skipped } => log::info!(
                    "Wrote {} rows for '{}' ({} skipped)",
                    rows,
                    task.query(),
                    skipped
                ),
                TaskOutcome::Aborted(e) => {
                    log::error!("Error scraping '{}': {:?}", task.query(), e)
                }
            }
            report.tasks.push(TaskReport {
                task: task.clone(),
                outcome,
            });

            time::sleep(settings.inter_task_delay()).await;
        }
    }

    report
}

pub async fn run_task<S, W>(
    surface: &S,
    sink: &mut W,
    task: &Task,
    settings: &SearchSettings,
    rules: &ExtractionRules,
) -> TaskOutcome
where
    S: SearchSurface + ?Sized,
    W: RecordSink + ?Sized,
{
    let mut results = match run_search(surface, settings, task).await {
        Ok(results) => results,
        Err(e) => {
            return TaskOutcome::Aborted(
                anyhow::Error::new(e).context(format!("search '{}' failed", task.query())),
            )
        }
    };

    let mut rows = 0;
    let mut skipped = 0;
    let mut position = 0;
    while let Some(capture) = results.listings.next().await {
        position += 1;
        match harvest_listing(capture, sink, rules, &task.keyword, &results.area) {
            ListingOutcome::Written(_) => rows += 1,
            ListingOutcome::Skipped(reason) => {
                log::warn!("{}", skip_message(&results.query, position, &reason));
                skipped += 1;
            }
        }
    }

    TaskOutcome::Completed { rows, skipped }
}

fn skip_message(query: &str, position: usize, reason: &str) -> String {
    format!(
        "Skipping listing #{} of '{}' due to error: {}",
        position, query, reason
    )
}

pub fn harvest_listing<W>(
    capture: Result<ListingCapture, SurfaceError>,
    sink: &mut W,
    rules: &ExtractionRules,
    keyword: &str,
    area: &str,
) -> ListingOutcome
where
    W: RecordSink + ?Sized,
{
    let capture = match capture {
        Ok(capture) => capture,
        Err(e) => return ListingOutcome::Skipped(e.to_string()),
    };

    let record = extract_record(&capture, rules, keyword, area);
    match sink.append(&record) {
        Ok(()) => ListingOutcome::Written(record),
        Err(e) => ListingOutcome::Skipped(format!("{:#}", e)),
    }
}
