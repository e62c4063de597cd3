//! Data ingestion stage
//!
//! Pulls every record from the source collection, snapshots it verbatim into
//! the feature store, then splits it into train and test partitions with a
//! seeded shuffle.

use thiserror::Error;
use tracing::info;

use super::artifact::IngestionArtifact;
use crate::config::IngestionConfig;
use crate::data::{train_test_split, DataError, DataSource};

/// Ingestion stage errors
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("data source error: {0}")]
    Source(#[from] DataError),

    #[error("source collection {0} yielded zero records")]
    EmptySource(String),

    #[error("split ratio {0} is outside the open interval (0, 1)")]
    InvalidSplitRatio(f64),
}

/// Result type for the ingestion stage
pub type Result<T> = std::result::Result<T, IngestionError>;

/// Data ingestion component
pub struct DataIngestion<'s, S: DataSource> {
    source: &'s S,
    config: IngestionConfig,
}

impl<'s, S: DataSource> DataIngestion<'s, S> {
    pub fn new(source: &'s S, config: IngestionConfig) -> Self {
        Self { source, config }
    }

    /// Snapshot, split, and persist the source feed
    pub fn run(&self) -> Result<IngestionArtifact> {
        let ratio = self.config.split_ratio;
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(IngestionError::InvalidSplitRatio(ratio));
        }

        let table = self.source.fetch_all()?;
        if table.n_rows() == 0 {
            return Err(IngestionError::EmptySource(
                self.source.collection().to_string(),
            ));
        }

        table.write_csv_path(&self.config.feature_store_path)?;

        let (train, test) = train_test_split(&table, ratio, self.config.seed);
        train.write_csv_path(&self.config.train_path)?;
        test.write_csv_path(&self.config.test_path)?;

        info!(
            collection = self.source.collection(),
            total_rows = table.n_rows(),
            train_rows = train.n_rows(),
            test_rows = test.n_rows(),
            "ingested source collection"
        );

        Ok(IngestionArtifact {
            feature_store_path: self.config.feature_store_path.clone(),
            train_path: self.config.train_path.clone(),
            test_path: self.config.test_path.clone(),
            train_rows: train.n_rows(),
            test_rows: test.n_rows(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{InMemorySource, Table};
    use tempfile::TempDir;

    fn config(dir: &std::path::Path, ratio: f64) -> IngestionConfig {
        IngestionConfig {
            feature_store_path: dir.join("feature_store/data.csv"),
            train_path: dir.join("ingested/train.csv"),
            test_path: dir.join("ingested/test.csv"),
            split_ratio: ratio,
            seed: 101,
        }
    }

    fn feed(n: usize) -> InMemorySource {
        let rows = (0..n).map(|i| vec![i.to_string()]).collect();
        InMemorySource::new("unit-feed", Table::new(vec!["v".into()], rows))
    }

    #[test]
    fn test_run_splits_and_persists() {
        let tmp = TempDir::new().unwrap();
        let artifact = DataIngestion::new(&feed(100), config(tmp.path(), 0.25))
            .run()
            .unwrap();

        assert_eq!(artifact.train_rows + artifact.test_rows, 100);
        assert_eq!(artifact.test_rows, 25);
        assert!(artifact.feature_store_path.exists());

        let train = Table::from_csv_path(&artifact.train_path).unwrap();
        let test = Table::from_csv_path(&artifact.test_path).unwrap();
        assert_eq!(train.n_rows(), artifact.train_rows);
        assert_eq!(test.n_rows(), artifact.test_rows);
    }

    #[test]
    fn test_feature_store_is_verbatim_snapshot() {
        let tmp = TempDir::new().unwrap();
        let source = feed(10);
        let artifact = DataIngestion::new(&source, config(tmp.path(), 0.3))
            .run()
            .unwrap();

        let snapshot = Table::from_csv_path(&artifact.feature_store_path).unwrap();
        assert_eq!(snapshot, source.fetch_all().unwrap());
    }

    #[test]
    fn test_empty_source_rejected() {
        let tmp = TempDir::new().unwrap();
        let err = DataIngestion::new(&feed(0), config(tmp.path(), 0.25))
            .run()
            .unwrap_err();
        assert!(matches!(err, IngestionError::EmptySource(_)));
        assert!(err.to_string().contains("unit-feed"));
    }

    #[test]
    fn test_split_ratio_bounds_rejected() {
        let tmp = TempDir::new().unwrap();
        for ratio in [0.0, 1.0, -0.2, 1.5] {
            let err = DataIngestion::new(&feed(10), config(tmp.path(), ratio))
                .run()
                .unwrap_err();
            assert!(matches!(err, IngestionError::InvalidSplitRatio(_)));
        }
    }

    #[test]
    fn test_unreachable_source_surfaces() {
        let tmp = TempDir::new().unwrap();
        let source = crate::data::CsvSource::new("gone", "/nonexistent/feed.csv");
        let err = DataIngestion::new(&source, config(tmp.path(), 0.25))
            .run()
            .unwrap_err();
        assert!(matches!(
            err,
            IngestionError::Source(DataError::Unavailable { .. })
        ));
    }
}
