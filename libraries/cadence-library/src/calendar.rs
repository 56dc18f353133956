/// Calendar view of library additions
use cadence_core::Track;
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};

/// One day of a month and the tracks added on it
#[derive(Debug, Clone, PartialEq)]
pub struct DayEntry {
    /// Day of month, starting at 1
    pub day: u32,
    pub tracks: Vec<Track>,
}

/// A month that saw at least one addition
///
/// `days` covers every day of the month, including empty ones.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthEntry {
    pub year: i32,
    pub month: u32,
    pub days: Vec<DayEntry>,
}

impl MonthEntry {
    /// Number of tracks added during the month
    pub fn track_count(&self) -> usize {
        self.days.iter().map(|d| d.tracks.len()).sum()
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(31, |last| last.day())
}

pub(crate) fn group_by_month(tracks: &[Track]) -> Vec<MonthEntry> {
    let mut by_day: BTreeMap<NaiveDate, Vec<Track>> = BTreeMap::new();
    for track in tracks {
        by_day
            .entry(track.added_at.date())
            .or_default()
            .push(track.clone());
    }

    let months: BTreeSet<(i32, u32)> = by_day.keys().map(|d| (d.year(), d.month())).collect();

    months
        .into_iter()
        .rev()
        .map(|(year, month)| {
            let days = (1..=days_in_month(year, month))
                .map(|day| DayEntry {
                    day,
                    tracks: NaiveDate::from_ymd_opt(year, month, day)
                        .and_then(|date| by_day.get(&date).cloned())
                        .unwrap_or_default(),
                })
                .collect();

            MonthEntry { year, month, days }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 4), 30);
    }

    #[test]
    fn empty_library_has_no_months() {
        assert!(group_by_month(&[]).is_empty());
    }
}
