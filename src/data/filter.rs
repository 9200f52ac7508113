use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::BikeDataset;

// ---------------------------------------------------------------------------
// Filter predicate: date range + season selection
// ---------------------------------------------------------------------------

/// The sidebar filter selections.
///
/// `seasons` holds the selected season labels; an empty set means "all
/// seasons" (the multi-select's cleared state, matching its default).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterState {
    /// Inclusive lower bound on `dteday`.
    pub date_from: NaiveDate,
    /// Inclusive upper bound on `dteday`.
    pub date_to: NaiveDate,
    /// Selected season labels; empty means no season constraint.
    pub seasons: BTreeSet<String>,
}

/// Initialise a [`FilterState`] covering the whole dataset: full date range,
/// every season selected.
pub fn init_filter_state(dataset: &BikeDataset) -> FilterState {
    FilterState {
        date_from: dataset.date_min,
        date_to: dataset.date_max,
        seasons: dataset.seasons.clone(),
    }
}

impl FilterState {
    /// Repair invalid input against the dataset instead of failing:
    /// * an inverted date range is swapped,
    /// * season labels not present in the data are dropped,
    /// * an empty (or emptied) season selection falls back to all seasons.
    ///
    /// A range lying outside the dataset's date bounds is not invalid; it is
    /// a valid selection that happens to match nothing.
    pub fn sanitized(&self, dataset: &BikeDataset) -> FilterState {
        let (mut from, mut to) = (self.date_from, self.date_to);
        if from > to {
            std::mem::swap(&mut from, &mut to);
        }

        let mut seasons: BTreeSet<String> = self
            .seasons
            .intersection(&dataset.seasons)
            .cloned()
            .collect();
        if seasons.is_empty() {
            seasons = dataset.seasons.clone();
        }

        FilterState {
            date_from: from,
            date_to: to,
            seasons,
        }
    }
}

/// Return indices of records that pass the (sanitized) filter.
///
/// Pure function of its inputs: relative row order is preserved and the
/// dataset is never mutated. A record passes when its date lies within the
/// inclusive range and its season is selected.
pub fn filtered_indices(dataset: &BikeDataset, filters: &FilterState) -> Vec<usize> {
    let f = filters.sanitized(dataset);
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            f.date_from <= rec.dteday
                && rec.dteday <= f.date_to
                && f.seasons.contains(&rec.season_daily)
        })
        .map(|(i, _)| i)
        .collect()
}
