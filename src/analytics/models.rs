use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Days covered by the daily view series, current day included.
pub const WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Desktop,
    Mobile,
    Tablet,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Desktop => "desktop",
            DeviceClass::Mobile => "mobile",
            DeviceClass::Tablet => "tablet",
        }
    }
}

/// One recorded visit to a public profile. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ViewEvent {
    pub id: i64,
    pub profile_id: i64,
    pub device_class: String,
    pub referrer_category: String,
    pub qr_scan: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct NewViewEvent {
    pub profile_id: i64,
    pub device_class: DeviceClass,
    pub referrer_category: String,
    pub qr_scan: bool,
    pub created_at: i64,
}

/// Raw grouped row: views per UTC day bucket (unix days).
#[derive(Debug, Clone, FromRow)]
pub struct DayCount {
    pub day_bucket: i64,
    pub views: i64,
}

/// Grouped count over a string dimension (device class, referrer category).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DimensionCount {
    pub dimension: String,
    pub views: i64,
}

/// One entry of the zero-filled daily series.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DailyViews {
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    pub views: i64,
}

fn day_bucket_of(date: NaiveDate) -> i64 {
    // NaiveDate::default() is the unix epoch.
    date.signed_duration_since(NaiveDate::default()).num_days()
}

/// Expand grouped day rows into a dense trailing window ending at `end_day`.
///
/// Always returns exactly [`WINDOW_DAYS`] entries, oldest first, with zero
/// counts for days that have no events. Rows outside the window are ignored.
pub fn fill_daily_window(rows: &[DayCount], end_day: NaiveDate) -> Vec<DailyViews> {
    let by_bucket: HashMap<i64, i64> = rows.iter().map(|r| (r.day_bucket, r.views)).collect();

    let mut series = Vec::with_capacity(WINDOW_DAYS as usize);
    for offset in (0..WINDOW_DAYS).rev() {
        let date = end_day - chrono::Days::new(offset as u64);
        let views = by_bucket.get(&day_bucket_of(date)).copied().unwrap_or(0);
        series.push(DailyViews {
            date: date.format("%Y-%m-%d").to_string(),
            views,
        });
    }
    series
}

/// Unix-timestamp lower bound of the trailing window ending at `end_day`.
pub fn window_start_ts(end_day: NaiveDate) -> i64 {
    let start_day = end_day - chrono::Days::new((WINDOW_DAYS - 1) as u64);
    day_bucket_of(start_day) * 86_400
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn window_is_always_thirty_entries() {
        let series = fill_daily_window(&[], date("2025-03-15"));
        assert_eq!(series.len(), 30);
        assert!(series.iter().all(|d| d.views == 0));
    }

    #[test]
    fn window_is_ordered_oldest_to_newest() {
        let series = fill_daily_window(&[], date("2025-03-15"));
        assert_eq!(series.first().unwrap().date, "2025-02-14");
        assert_eq!(series.last().unwrap().date, "2025-03-15");
    }

    #[test]
    fn counts_land_on_their_day() {
        let end = date("2025-03-15");
        let bucket = day_bucket_of(date("2025-03-10"));
        let series = fill_daily_window(
            &[DayCount {
                day_bucket: bucket,
                views: 7,
            }],
            end,
        );
        let hit: Vec<_> = series.iter().filter(|d| d.views > 0).collect();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].date, "2025-03-10");
        assert_eq!(hit[0].views, 7);
    }

    #[test]
    fn rows_outside_window_are_ignored() {
        let end = date("2025-03-15");
        let stale = day_bucket_of(date("2024-01-01"));
        let series = fill_daily_window(
            &[DayCount {
                day_bucket: stale,
                views: 99,
            }],
            end,
        );
        assert!(series.iter().all(|d| d.views == 0));
    }

    #[test]
    fn window_start_covers_twenty_nine_days_back() {
        let end = date("2025-03-15");
        let start_ts = window_start_ts(end);
        assert_eq!(start_ts % 86_400, 0);
        assert_eq!(start_ts / 86_400, day_bucket_of(date("2025-02-14")));
    }
}
