use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::aggregate::{self, ViewModel};
use crate::data::filter::{filtered_indices, init_filter_state, FilterState};
use crate::data::model::BikeDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None when the one-time load failed).
    pub dataset: Option<Arc<BikeDataset>>,

    /// Fatal load error message, shown instead of the dashboard.
    pub load_error: Option<String>,

    /// Sidebar filter selections.
    pub filters: FilterState,

    /// Indices of rows passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Aggregation results for the current view; None means the filtered
    /// view is empty (the "no data in range" state).
    pub view: Option<ViewModel>,

    /// Season label → colour, shared by sidebar and charts.
    pub season_colors: ColorMap,

    /// Weather label → colour.
    pub weather_colors: ColorMap,
}

impl AppState {
    /// State for a successfully loaded dataset: all filters wide open, the
    /// pipeline run once over the full table.
    pub fn with_dataset(dataset: Arc<BikeDataset>) -> Self {
        let mut state = AppState {
            filters: init_filter_state(&dataset),
            season_colors: ColorMap::new(&dataset.seasons),
            weather_colors: ColorMap::new(&dataset.weather_conditions),
            dataset: Some(dataset),
            load_error: None,
            visible_indices: Vec::new(),
            view: None,
        };
        state.refilter();
        state
    }

    /// State for a fatal load failure; the UI renders only the error.
    pub fn load_failed(message: String) -> Self {
        AppState {
            dataset: None,
            load_error: Some(message),
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            view: None,
            season_colors: ColorMap::default(),
            weather_colors: ColorMap::default(),
        }
    }

    /// Re-run the Filter → Aggregation pipeline after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filters);
            self.view = aggregate::view_model(ds, &self.visible_indices).ok();
        }
    }

    /// Toggle a single season in the filter selection.
    pub fn toggle_season(&mut self, season: &str) {
        if self.filters.seasons.contains(season) {
            self.filters.seasons.remove(season);
        } else {
            self.filters.seasons.insert(season.to_string());
        }
        self.refilter();
    }

    /// Select every season.
    pub fn select_all_seasons(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters.seasons = ds.seasons.clone();
            self.refilter();
        }
    }

    /// Deselect every season. An empty selection filters like "all", so the
    /// dashboard stays populated (the multi-select's cleared default).
    pub fn select_no_seasons(&mut self) {
        self.filters.seasons.clear();
        self.refilter();
    }

    /// Reset the date range to the dataset bounds and select all seasons.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters = init_filter_state(ds);
            self.refilter();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::BikeRecord;

    fn dataset() -> Arc<BikeDataset> {
        let rec = |date: &str, season: &str| BikeRecord {
            dteday: date.parse().unwrap(),
            hr: 8,
            workingday_daily: "Working Day".into(),
            cnt_daily: 100.0,
            cnt_hourly: 10.0,
            season_daily: season.into(),
            weathersit_daily: "Clear".into(),
        };
        Arc::new(BikeDataset::from_records(vec![
            rec("2011-04-01", "Spring"),
            rec("2011-07-01", "Summer"),
        ]))
    }

    #[test]
    fn with_dataset_starts_wide_open() {
        let state = AppState::with_dataset(dataset());
        assert_eq!(state.visible_indices, vec![0, 1]);
        assert!(state.view.is_some());
        assert_eq!(state.filters.seasons.len(), 2);
    }

    #[test]
    fn toggling_a_season_reruns_the_pipeline() {
        let mut state = AppState::with_dataset(dataset());
        state.toggle_season("Spring");
        assert_eq!(state.visible_indices, vec![1]);
        let vm = state.view.as_ref().unwrap();
        assert_eq!(vm.summary.popular_season, "Summer");
    }

    #[test]
    fn out_of_range_dates_yield_no_view() {
        let mut state = AppState::with_dataset(dataset());
        state.filters.date_from = "2011-05-01".parse().unwrap();
        state.filters.date_to = "2011-05-02".parse().unwrap();
        state.refilter();
        assert!(state.visible_indices.is_empty());
        assert!(state.view.is_none());
    }

    #[test]
    fn reset_restores_the_initial_view() {
        let mut state = AppState::with_dataset(dataset());
        state.toggle_season("Spring");
        state.filters.date_from = "2011-06-01".parse().unwrap();
        state.reset_filters();
        assert_eq!(state.visible_indices, vec![0, 1]);
    }
}
