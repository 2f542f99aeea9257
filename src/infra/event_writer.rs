// ============================================================
// Layer 6 — Scalar Event Writer
// ============================================================
// Records scalar time series for a training run so external tools
// (spreadsheets, plotting scripts, dashboards) can draw learning
// curves.
//
// Output file: {runs_dir}/scalars.csv
//
//   wall_time,step,tag,value
//   1760000000.125,1,Loss/train,2.301200
//   1760000000.125,1,Accuracy/train,11.250000
//   ...
//
// Tags used by the training loop:
//   Loss/train, Accuracy/train, Loss/val, Accuracy/val

use anyhow::{Context, Result};
use csv::{Writer, WriterBuilder};
use std::{
    fs::{self, File, OpenOptions},
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::domain::traits::ScalarSink;

const EVENTS_FILE: &str = "scalars.csv";

pub struct ScalarWriter {
    run_dir: PathBuf,
    writer:  Writer<File>,
}

impl ScalarWriter {
    /// Open (or create) the event file under `run_dir`.
    ///
    /// The header is written only for a new file, so resumed runs
    /// keep appending to the same log.
    pub fn new(run_dir: impl Into<PathBuf>) -> Result<Self> {
        let run_dir = run_dir.into();
        fs::create_dir_all(&run_dir)
            .with_context(|| format!("Cannot create run directory '{}'", run_dir.display()))?;

        let path   = run_dir.join(EVENTS_FILE);
        let is_new = !path.exists();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Cannot open event log '{}'", path.display()))?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if is_new {
            writer.write_record(["wall_time", "step", "tag", "value"])?;
            tracing::debug!("Created event log: '{}'", path.display());
        }

        Ok(Self { run_dir, writer })
    }

    pub fn events_path(&self) -> PathBuf {
        self.run_dir.join(EVENTS_FILE)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush event log")
    }

    /// Flush and release the event file.
    pub fn close(mut self) -> Result<()> {
        self.flush()?;
        tracing::debug!("Closed event log: '{}'", self.events_path().display());
        Ok(())
    }
}

impl ScalarSink for ScalarWriter {
    fn add_scalar(&mut self, tag: &str, value: f64, step: usize) -> Result<()> {
        let wall_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);

        self.writer.write_record([
            format!("{wall_time:.3}"),
            step.to_string(),
            tag.to_string(),
            format!("{value:.6}"),
        ])?;

        tracing::trace!("scalar {} @ {} = {:.6}", tag, step, value);
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn rows(path: &Path) -> Vec<Vec<String>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .unwrap();
        rdr.records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = ScalarWriter::new(dir.path().join("runs/experiment_1")).unwrap();
        w.add_scalar("Loss/train", 1.5, 1).unwrap();
        w.add_scalar("Accuracy/train", 42.0, 1).unwrap();
        let path = w.events_path();
        w.close().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("wall_time,step,tag,value\n"));

        let rows = rows(&path);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][1..], ["1", "Loss/train", "1.500000"]);
        assert_eq!(rows[1][2], "Accuracy/train");
    }

    #[test]
    fn test_reopen_appends_without_second_header() {
        let dir = tempfile::tempdir().unwrap();

        let mut w = ScalarWriter::new(dir.path()).unwrap();
        w.add_scalar("Loss/train", 2.0, 1).unwrap();
        w.close().unwrap();

        let mut w = ScalarWriter::new(dir.path()).unwrap();
        w.add_scalar("Loss/train", 1.0, 2).unwrap();
        let path = w.events_path();
        w.close().unwrap();

        let rows = rows(&path);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][1], "2");
    }
}
