use std::io::Read;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use anyhow::{bail, Context, Result};

use super::model::{BikeDataset, BikeRecord};

/// Location of the bike-sharing CSV, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/bike_df.csv";

// ---------------------------------------------------------------------------
// Process-wide dataset singleton
// ---------------------------------------------------------------------------

static DATASET: OnceLock<Result<Arc<BikeDataset>>> = OnceLock::new();

/// The process-wide dataset, loaded from [`DEFAULT_DATA_PATH`] on first
/// access and read-only thereafter. A load failure is also remembered, so the
/// file is touched at most once per process.
pub fn shared_dataset() -> &'static Result<Arc<BikeDataset>> {
    DATASET.get_or_init(|| load_csv(Path::new(DEFAULT_DATA_PATH)).map(Arc::new))
}

// ---------------------------------------------------------------------------
// CSV loading
// ---------------------------------------------------------------------------

/// Load the bike-sharing dataset from a CSV file.
///
/// Expects a header row with at least the [`BikeRecord`] columns; extra
/// columns are ignored. Any unreadable row is a load failure, not a skipped
/// row: a malformed resource must not produce a partially rendered dashboard.
pub fn load_csv(path: &Path) -> Result<BikeDataset> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    read_records(file).with_context(|| format!("reading {}", path.display()))
}

fn read_records<R: Read>(input: R) -> Result<BikeDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let mut records: Vec<BikeRecord> = Vec::new();

    for (row_no, result) in reader.deserialize::<BikeRecord>().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.hr > 23 {
            bail!("CSV row {row_no}: hour {} out of range 0-23", record.hr);
        }
        records.push(record);
    }

    if records.is_empty() {
        bail!("dataset contains no rows");
    }
    Ok(BikeDataset::from_records(records))
}
