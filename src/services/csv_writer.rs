use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::domain::listing::{BusinessRecord, CSV_HEADER};

/// Where extracted records go, one city at a time.
pub trait RecordSink {
    /// Starts a fresh output for `city`; later appends go there.
    fn start_city(&mut self, city: &str) -> anyhow::Result<()>;

    fn append(&mut self, record: &BusinessRecord) -> anyhow::Result<()>;
}

/// Writes `<directory>/businesses_<city>.csv`, truncating any previous run's file.
pub struct CsvSink {
    directory: PathBuf,
    writer: Option<csv::Writer<File>>,
}

impl CsvSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        CsvSink {
            directory: directory.into(),
            writer: None,
        }
    }

    pub fn city_path(&self, city: &str) -> PathBuf {
        city_file_path(&self.directory, city)
    }
}

pub fn city_file_path(directory: &Path, city: &str) -> PathBuf {
    directory.join(format!("businesses_{}.csv", city))
}

impl RecordSink for CsvSink {
    fn start_city(&mut self, city: &str) -> anyhow::Result<()> {
        // Flush and close the previous city before opening the next
        self.writer = None;

        fs::create_dir_all(&self.directory).with_context(|| {
            format!("Failed to create output directory {:?}", self.directory)
        })?;
        let path = self.city_path(city);
        let file = File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(CSV_HEADER)?;
        writer.flush()?;

        log::debug!("Writing results to {:?}", path);
        self.writer = Some(writer);
        Ok(())
    }

    fn append(&mut self, record: &BusinessRecord) -> anyhow::Result<()> {
        let writer = self
            .writer
            .as_mut()
            .context("No city output has been started")?;
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }
}
