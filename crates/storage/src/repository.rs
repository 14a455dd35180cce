//! Snapshot Repository

use crate::timestamp::parse_timestamp;
use crate::StorageError;
use chrono::NaiveDateTime;
use feature_engine::FeatureSnapshot;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

pub const TIMESTAMP_COLUMN: &str = "Timestamp";

/// Time-sorted, read-only telemetry
#[derive(Debug, Clone, Default)]
pub struct SnapshotRepository {
    snapshots: Vec<FeatureSnapshot>,
}

impl SnapshotRepository {
    /// Wrap already-parsed snapshots, sorting them by time.
    ///
    /// Rows sharing a timestamp keep their input order.
    pub fn new(mut snapshots: Vec<FeatureSnapshot>) -> Self {
        snapshots.sort_by_key(|s| s.timestamp());
        Self { snapshots }
    }

    /// Load a CSV export
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        info!("Loading telemetry from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse CSV with a `Timestamp` column.
    ///
    /// Every other cell that parses as a number becomes a feature; text cells
    /// are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StorageError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = rdr.headers()?.clone();

        let ts_index = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(TIMESTAMP_COLUMN))
            .ok_or_else(|| StorageError::MissingColumn(TIMESTAMP_COLUMN.to_string()))?;

        let mut snapshots = Vec::new();
        let mut skipped_cells = 0usize;

        for result in rdr.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());

            let raw_ts = record.get(ts_index).unwrap_or_default();
            let timestamp = parse_timestamp(raw_ts).map_err(|e| StorageError::InvalidRow {
                line,
                message: e.to_string(),
            })?;

            let mut snapshot = FeatureSnapshot::new(timestamp);
            for (index, (name, cell)) in headers.iter().zip(record.iter()).enumerate() {
                if index == ts_index {
                    continue;
                }
                match parse_cell(cell) {
                    Some(value) => snapshot.set(name, value),
                    None => skipped_cells += 1,
                }
            }
            snapshots.push(snapshot);
        }

        if skipped_cells > 0 {
            debug!("Skipped {} non-numeric cells", skipped_cells);
        }

        let repository = Self::new(snapshots);
        match (repository.first(), repository.latest()) {
            (Some(first), Some(latest)) => info!(
                "Loaded {} snapshots from {} to {}",
                repository.len(),
                first.timestamp(),
                latest.timestamp()
            ),
            _ => warn!("Telemetry source contained no rows"),
        }
        Ok(repository)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[FeatureSnapshot] {
        &self.snapshots
    }

    /// Earliest snapshot
    pub fn first(&self) -> Option<&FeatureSnapshot> {
        self.snapshots.first()
    }

    /// Most recent snapshot
    pub fn latest(&self) -> Option<&FeatureSnapshot> {
        self.snapshots.last()
    }

    /// Snapshot closest in time to `target`.
    ///
    /// Equal distances resolve to the earliest candidate.
    pub fn nearest(&self, target: NaiveDateTime) -> Option<&FeatureSnapshot> {
        let after = self.snapshots.partition_point(|s| s.timestamp() < target);

        let chosen = match (after.checked_sub(1), self.snapshots.get(after)) {
            (None, None) => return None,
            (None, Some(_)) => after,
            (Some(before), None) => before,
            (Some(before), Some(next)) => {
                let back = target - self.snapshots[before].timestamp();
                let ahead = next.timestamp() - target;
                if back <= ahead {
                    before
                } else {
                    after
                }
            }
        };

        // First of any run sharing the chosen timestamp
        let chosen_ts = self.snapshots[chosen].timestamp();
        let first = self.snapshots.partition_point(|s| s.timestamp() < chosen_ts);
        self.snapshots.get(first)
    }

    /// Snapshots with `start <= timestamp <= end`
    pub fn window(&self, start: NaiveDateTime, end: NaiveDateTime) -> &[FeatureSnapshot] {
        if start > end {
            return &[];
        }
        let lo = self.snapshots.partition_point(|s| s.timestamp() < start);
        let hi = self.snapshots.partition_point(|s| s.timestamp() <= end);
        &self.snapshots[lo..hi]
    }
}

fn parse_cell(cell: &str) -> Option<f64> {
    if let Ok(value) = cell.parse::<f64>() {
        return Some(value);
    }
    if cell.eq_ignore_ascii_case("true") {
        Some(1.0)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(0.0)
    } else {
        None
    }
}
