// ============================================================
// Layer 4 — CSV Sample Loader
// ============================================================
// Reads labelled samples from a CSV file, one sample per row:
//
//   label,f1,f2,...,fN
//
// The label is a class index in [0, num_classes) and N must equal
// model.input_size. A malformed row fails the whole load with the
// row number in the error, so bad data never reaches training.

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use std::path::PathBuf;

use crate::domain::sample::ClassificationSample;
use crate::domain::traits::SampleSource;

pub struct CsvSampleLoader {
    path:         PathBuf,
    has_headers:  bool,
    num_features: usize,
    num_classes:  usize,
}

impl CsvSampleLoader {
    pub fn new(
        path:         impl Into<PathBuf>,
        has_headers:  bool,
        num_features: usize,
        num_classes:  usize,
    ) -> Self {
        Self { path: path.into(), has_headers, num_features, num_classes }
    }
}

impl SampleSource for CsvSampleLoader {
    fn load_all(&self) -> Result<Vec<ClassificationSample>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(self.has_headers)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .with_context(|| format!("Cannot open dataset '{}'", self.path.display()))?;

        let mut samples = Vec::new();

        for (idx, record) in reader.records().enumerate() {
            let row    = idx + 1;
            let record = record
                .with_context(|| format!("Cannot read row {row} of '{}'", self.path.display()))?;

            let expected = self.num_features + 1;
            if record.len() != expected {
                bail!(
                    "Row {row} of '{}' has {} columns, expected {} (label + {} features)",
                    self.path.display(),
                    record.len(),
                    expected,
                    self.num_features
                );
            }

            let label: usize = record[0]
                .parse()
                .with_context(|| format!("Row {row}: label '{}' is not a class index", &record[0]))?;
            if label >= self.num_classes {
                bail!(
                    "Row {row}: label {label} is out of range for {} classes",
                    self.num_classes
                );
            }

            let features = record
                .iter()
                .skip(1)
                .enumerate()
                .map(|(col, v)| {
                    v.parse::<f32>()
                        .with_context(|| format!("Row {row}, feature {col}: '{v}' is not a number"))
                })
                .collect::<Result<Vec<f32>>>()?;

            samples.push(ClassificationSample::new(features, label));
        }

        tracing::info!(
            "Loaded {} samples from '{}'",
            samples.len(),
            self.path.display()
        );
        Ok(samples)
    }

    fn describe(&self) -> String {
        format!("csv file '{}'", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.csv");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_loads_rows() {
        let (_dir, path) = write_csv("1,0.5,0.25,0.0\n0, 1.0, 2.0, 3.0\n");
        let samples = CsvSampleLoader::new(&path, false, 3, 2).load_all().unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], ClassificationSample::new(vec![0.5, 0.25, 0.0], 1));
        assert_eq!(samples[1].features, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_skips_header_when_configured() {
        let (_dir, path) = write_csv("label,a,b\n2,1,1\n");
        let samples = CsvSampleLoader::new(&path, true, 2, 3).load_all().unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].label, 2);
    }

    #[test]
    fn test_wrong_width_names_the_row() {
        let (_dir, path) = write_csv("0,1,2\n1,1\n");
        let err = CsvSampleLoader::new(&path, false, 2, 2)
            .load_all()
            .unwrap_err()
            .to_string();
        assert!(err.contains("Row 2"), "{err}");
    }

    #[test]
    fn test_label_out_of_range() {
        let (_dir, path) = write_csv("5,1,2\n");
        assert!(CsvSampleLoader::new(&path, false, 2, 3).load_all().is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CsvSampleLoader::new(dir.path().join("nope.csv"), false, 2, 2);
        assert!(loader.load_all().is_err());
    }
}
