use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// BikeRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single bike-rental observation (one row of the source CSV).
///
/// The source table is the hourly bike-sharing dataset joined with its daily
/// counterpart, so every hourly row also carries the day-level columns
/// (`*_daily`). Columns not listed here are ignored on load.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BikeRecord {
    /// Calendar date (ISO 8601 in the CSV).
    pub dteday: NaiveDate,
    /// Hour of day, 0–23.
    pub hr: u32,
    /// Day-type label, e.g. "Working Day" / "Holiday".
    pub workingday_daily: String,
    /// Total rentals for the whole day.
    pub cnt_daily: f64,
    /// Rentals within this hour.
    pub cnt_hourly: f64,
    /// Season label, e.g. "Spring".
    pub season_daily: String,
    /// Weather-condition label, e.g. "Clear".
    pub weathersit_daily: String,
}

// ---------------------------------------------------------------------------
// BikeDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed categorical domains and date
/// bounds. Immutable after load; filtering produces index views, never
/// mutated copies.
#[derive(Debug, Clone)]
pub struct BikeDataset {
    /// All observations (rows), in file order.
    pub records: Vec<BikeRecord>,
    /// Sorted set of distinct season labels present in the data.
    pub seasons: BTreeSet<String>,
    /// Sorted set of distinct weather-condition labels.
    pub weather_conditions: BTreeSet<String>,
    /// Sorted set of distinct day-type labels.
    pub day_types: BTreeSet<String>,
    /// Earliest date in the data.
    pub date_min: NaiveDate,
    /// Latest date in the data.
    pub date_max: NaiveDate,
}

impl BikeDataset {
    /// Build domain indices and date bounds from the loaded records.
    ///
    /// The loader rejects empty files, so `records` is non-empty in practice;
    /// for an empty slice the date bounds degrade to `NaiveDate::default()`.
    pub fn from_records(records: Vec<BikeRecord>) -> Self {
        let mut seasons = BTreeSet::new();
        let mut weather_conditions = BTreeSet::new();
        let mut day_types = BTreeSet::new();
        let mut date_min = NaiveDate::MAX;
        let mut date_max = NaiveDate::MIN;

        for rec in &records {
            seasons.insert(rec.season_daily.clone());
            weather_conditions.insert(rec.weathersit_daily.clone());
            day_types.insert(rec.workingday_daily.clone());
            date_min = date_min.min(rec.dteday);
            date_max = date_max.max(rec.dteday);
        }
        if records.is_empty() {
            date_min = NaiveDate::default();
            date_max = NaiveDate::default();
        }

        BikeDataset {
            records,
            seasons,
            weather_conditions,
            day_types,
            date_min,
            date_max,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, season: &str) -> BikeRecord {
        BikeRecord {
            dteday: date.parse().unwrap(),
            hr: 0,
            workingday_daily: "Working Day".into(),
            cnt_daily: 100.0,
            cnt_hourly: 10.0,
            season_daily: season.into(),
            weathersit_daily: "Clear".into(),
        }
    }

    #[test]
    fn domains_and_bounds_come_from_the_data() {
        let ds = BikeDataset::from_records(vec![
            rec("2011-03-01", "Spring"),
            rec("2011-07-15", "Summer"),
            rec("2011-01-05", "Winter"),
            rec("2011-07-15", "Summer"),
        ]);

        assert_eq!(ds.len(), 4);
        assert_eq!(
            ds.seasons.iter().collect::<Vec<_>>(),
            ["Spring", "Summer", "Winter"]
        );
        assert_eq!(ds.date_min, "2011-01-05".parse().unwrap());
        assert_eq!(ds.date_max, "2011-07-15".parse().unwrap());
    }
}
