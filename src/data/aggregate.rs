use std::collections::BTreeMap;

use thiserror::Error;

use super::model::{BikeDataset, BikeRecord};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The filtered view is empty, so means and argmaxes are undefined.
/// Recoverable: the UI renders a placeholder instead of the dashboard body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no data for the selected filters")]
pub struct NoDataInRange;

// ---------------------------------------------------------------------------
// Aggregation outputs
// ---------------------------------------------------------------------------

/// Five-number summary of a group's measure values, for box plots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// The derived scalars shown on the metric cards.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Mean of `cnt_daily` over the view, truncated toward zero.
    pub avg_daily_users: i64,
    /// Hour (0–23) with the highest mean `cnt_hourly`; earliest hour on ties.
    pub peak_hour: u32,
    /// That hour's mean, truncated toward zero.
    pub peak_hour_users: i64,
    /// Season with the highest mean `cnt_daily`; lexicographically first on ties.
    pub popular_season: String,
    /// That season's mean, truncated toward zero.
    pub popular_season_avg: i64,
}

/// Everything the presentation layer needs for one pipeline run: the four
/// aggregations plus the summary scalars. Pure data, no widget state.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub summary: Summary,
    /// Mean `cnt_daily` per day-type label, sorted by label (bar chart).
    pub workingday_means: Vec<(String, f64)>,
    /// `cnt_daily` distribution per weather label, sorted by label (box plot).
    pub weather_boxes: Vec<(String, BoxStats)>,
    /// `cnt_daily` distribution per season label, sorted by label (box plot).
    pub season_boxes: Vec<(String, BoxStats)>,
    /// Mean `cnt_hourly` per hour, ascending (line chart).
    pub hourly_means: Vec<(u32, f64)>,
}

// ---------------------------------------------------------------------------
// Pipeline entry point
// ---------------------------------------------------------------------------

/// Compute the full [`ViewModel`] for a filtered view, given as row indices
/// into `dataset` (the Filter stage's output).
pub fn view_model(dataset: &BikeDataset, indices: &[usize]) -> Result<ViewModel, NoDataInRange> {
    if indices.is_empty() {
        return Err(NoDataInRange);
    }

    let workingday_means: Vec<(String, f64)> =
        grouped(dataset, indices, |r| r.workingday_daily.clone(), |r| r.cnt_daily)
            .into_iter()
            .map(|(label, values)| (label, mean(&values)))
            .collect();

    let weather_boxes = box_stats_per_group(grouped(
        dataset,
        indices,
        |r| r.weathersit_daily.clone(),
        |r| r.cnt_daily,
    ));

    let season_groups = grouped(dataset, indices, |r| r.season_daily.clone(), |r| r.cnt_daily);
    let season_means: Vec<(String, f64)> = season_groups
        .iter()
        .map(|(label, values)| (label.clone(), mean(values)))
        .collect();
    let season_boxes = box_stats_per_group(season_groups);

    let hourly_means: Vec<(u32, f64)> =
        grouped(dataset, indices, |r| r.hr, |r| r.cnt_hourly)
            .into_iter()
            .map(|(hour, values)| (hour, mean(&values)))
            .collect();

    let daily: Vec<f64> = indices.iter().map(|&i| dataset.records[i].cnt_daily).collect();
    let (peak_hour, peak_mean) = stable_argmax(&hourly_means).ok_or(NoDataInRange)?;
    let (popular_season, season_avg) = stable_argmax(&season_means).ok_or(NoDataInRange)?;

    let summary = Summary {
        avg_daily_users: mean(&daily).trunc() as i64,
        peak_hour,
        peak_hour_users: peak_mean.trunc() as i64,
        popular_season,
        popular_season_avg: season_avg.trunc() as i64,
    };

    Ok(ViewModel {
        summary,
        workingday_means,
        weather_boxes,
        season_boxes,
        hourly_means,
    })
}

// ---------------------------------------------------------------------------
// Grouped reductions
// ---------------------------------------------------------------------------

/// Collect a measure per group key over the view. `BTreeMap` keeps the groups
/// in ascending key order, which downstream argmaxes rely on for stability.
fn grouped<K, FK, FV>(
    dataset: &BikeDataset,
    indices: &[usize],
    key: FK,
    measure: FV,
) -> BTreeMap<K, Vec<f64>>
where
    K: Ord,
    FK: Fn(&BikeRecord) -> K,
    FV: Fn(&BikeRecord) -> f64,
{
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for &i in indices {
        let rec = &dataset.records[i];
        groups.entry(key(rec)).or_default().push(measure(rec));
    }
    groups
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// First key (in iteration order) whose value is maximal. Later keys replace
/// the best only on a strictly greater value, so ties resolve to the earliest
/// key.
fn stable_argmax<K: Clone>(pairs: &[(K, f64)]) -> Option<(K, f64)> {
    let mut best: Option<(K, f64)> = None;
    for (key, value) in pairs {
        let replace = match &best {
            Some((_, best_value)) => *value > *best_value,
            None => true,
        };
        if replace {
            best = Some((key.clone(), *value));
        }
    }
    best
}

fn box_stats_per_group(groups: BTreeMap<String, Vec<f64>>) -> Vec<(String, BoxStats)> {
    groups
        .into_iter()
        .filter_map(|(label, values)| BoxStats::from_values(values).map(|s| (label, s)))
        .collect()
}

impl BoxStats {
    /// Five-number summary with quartiles by linear interpolation between
    /// closest ranks. Returns `None` for an empty slice.
    pub fn from_values(mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        Some(BoxStats {
            min: values[0],
            q1: percentile(&values, 0.25),
            median: percentile(&values, 0.50),
            q3: percentile(&values, 0.75),
            max: values[values.len() - 1],
        })
    }
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = rank - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, hr: u32, day_type: &str, cnt_daily: f64, cnt_hourly: f64, season: &str, weather: &str) -> BikeRecord {
        BikeRecord {
            dteday: date.parse().unwrap(),
            hr,
            workingday_daily: day_type.into(),
            cnt_daily,
            cnt_hourly,
            season_daily: season.into(),
            weathersit_daily: weather.into(),
        }
    }

    fn all_indices(ds: &BikeDataset) -> Vec<usize> {
        (0..ds.len()).collect()
    }

    #[test]
    fn empty_view_yields_no_data_in_range() {
        let ds = BikeDataset::from_records(vec![rec(
            "2011-01-01", 0, "Holiday", 100.0, 10.0, "Winter", "Clear",
        )]);
        assert_eq!(view_model(&ds, &[]), Err(NoDataInRange));
    }

    #[test]
    fn avg_daily_users_is_truncated_mean() {
        let ds = BikeDataset::from_records(vec![
            rec("2011-01-01", 0, "Holiday", 100.0, 1.0, "Winter", "Clear"),
            rec("2011-01-02", 0, "Holiday", 101.0, 1.0, "Winter", "Clear"),
            rec("2011-01-03", 0, "Holiday", 104.0, 1.0, "Winter", "Clear"),
        ]);
        // mean = 101.666…, truncated toward zero
        let vm = view_model(&ds, &all_indices(&ds)).unwrap();
        assert_eq!(vm.summary.avg_daily_users, 101);
    }

    #[test]
    fn peak_hour_picks_the_maximal_hourly_mean() {
        // Hours 0–23 with mean 5, except a spike of 50 at hour 17.
        let records: Vec<BikeRecord> = (0..24)
            .map(|h| {
                let cnt = if h == 17 { 50.0 } else { 5.0 };
                rec("2011-06-01", h, "Working Day", 200.0, cnt, "Summer", "Clear")
            })
            .collect();
        let ds = BikeDataset::from_records(records);

        let vm = view_model(&ds, &all_indices(&ds)).unwrap();
        assert_eq!(vm.summary.peak_hour, 17);
        assert_eq!(vm.summary.peak_hour_users, 50);
        assert_eq!(vm.hourly_means.len(), 24);
        // ascending hour order
        let hours: Vec<u32> = vm.hourly_means.iter().map(|&(h, _)| h).collect();
        assert_eq!(hours, (0..24).collect::<Vec<_>>());
    }

    #[test]
    fn argmax_ties_resolve_to_the_earliest_key() {
        let ds = BikeDataset::from_records(vec![
            rec("2011-06-01", 8, "Working Day", 300.0, 40.0, "Summer", "Clear"),
            rec("2011-06-01", 17, "Working Day", 300.0, 40.0, "Summer", "Clear"),
            rec("2011-09-01", 11, "Working Day", 300.0, 10.0, "Fall", "Clear"),
        ]);
        let vm = view_model(&ds, &all_indices(&ds)).unwrap();
        assert_eq!(vm.summary.peak_hour, 8);
        // Fall and Summer daily means are both 300 → lexicographically first.
        assert_eq!(vm.summary.popular_season, "Fall");
        assert_eq!(vm.summary.popular_season_avg, 300);
    }

    #[test]
    fn workingday_means_are_grouped_by_day_type() {
        let ds = BikeDataset::from_records(vec![
            rec("2011-06-01", 8, "Working Day", 300.0, 30.0, "Summer", "Clear"),
            rec("2011-06-02", 8, "Working Day", 500.0, 30.0, "Summer", "Clear"),
            rec("2011-06-04", 8, "Holiday", 200.0, 30.0, "Summer", "Clear"),
        ]);
        let vm = view_model(&ds, &all_indices(&ds)).unwrap();
        assert_eq!(
            vm.workingday_means,
            vec![("Holiday".to_string(), 200.0), ("Working Day".to_string(), 400.0)]
        );
    }

    #[test]
    fn aggregations_only_see_rows_in_the_view() {
        let ds = BikeDataset::from_records(vec![
            rec("2011-06-01", 8, "Working Day", 300.0, 30.0, "Summer", "Clear"),
            rec("2011-12-01", 8, "Working Day", 900.0, 90.0, "Winter", "Mist"),
        ]);
        // View excludes the winter row.
        let vm = view_model(&ds, &[0]).unwrap();
        assert_eq!(vm.summary.avg_daily_users, 300);
        assert_eq!(vm.weather_boxes.len(), 1);
        assert_eq!(vm.weather_boxes[0].0, "Clear");
        assert_eq!(vm.season_boxes.len(), 1);
    }

    #[test]
    fn box_stats_five_number_summary() {
        let stats = BoxStats::from_values(vec![7.0, 1.0, 3.0, 5.0, 9.0]).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.q1, 3.0);
        assert_eq!(stats.median, 5.0);
        assert_eq!(stats.q3, 7.0);
        assert_eq!(stats.max, 9.0);
    }

    #[test]
    fn box_stats_interpolates_quartiles() {
        let stats = BoxStats::from_values(vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(stats.q1, 1.75);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.q3, 3.25);
    }

    #[test]
    fn box_stats_empty_is_none() {
        assert_eq!(BoxStats::from_values(Vec::new()), None);
    }

    #[test]
    fn single_row_view_is_well_defined() {
        let ds = BikeDataset::from_records(vec![rec(
            "2011-06-01", 14, "Working Day", 321.0, 45.0, "Summer", "Clear",
        )]);
        let vm = view_model(&ds, &[0]).unwrap();
        assert_eq!(vm.summary.avg_daily_users, 321);
        assert_eq!(vm.summary.peak_hour, 14);
        assert_eq!(vm.summary.peak_hour_users, 45);
        assert_eq!(vm.summary.popular_season, "Summer");
        assert_eq!(vm.hourly_means, vec![(14, 45.0)]);
        let stats = vm.season_boxes[0].1;
        assert_eq!(stats.min, stats.max);
        assert_eq!(stats.median, 321.0);
    }
}
