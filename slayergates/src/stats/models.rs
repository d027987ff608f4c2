//! Statistics data models and the pure folds behind them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Points awarded for each win
pub const POINTS_PER_WIN: i64 = 3;

/// Cumulative total at the end of one calendar day (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthPoint {
    pub date: NaiveDate,
    pub total: i64,
}

/// Grouped count, e.g. players of one team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}

impl From<(String, i64)> for LabelCount {
    fn from((label, count): (String, i64)) -> Self {
        Self { label, count }
    }
}

/// Fold creation times into one cumulative point per distinct date
pub fn cumulative_by_date(times: &[DateTime<Utc>]) -> Vec<GrowthPoint> {
    let mut dates: Vec<NaiveDate> = times.iter().map(|t| t.date_naive()).collect();
    dates.sort_unstable();

    let mut points: Vec<GrowthPoint> = Vec::new();
    for (index, date) in dates.into_iter().enumerate() {
        let total = index as i64 + 1;
        match points.last_mut() {
            Some(last) if last.date == date => last.total = total,
            _ => points.push(GrowthPoint { date, total }),
        }
    }
    points
}

/// Win/loss tally of one team
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Standing {
    pub wins: i64,
    pub losses: i64,
}

impl Standing {
    pub fn points(&self) -> i64 {
        self.wins * POINTS_PER_WIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_cumulative_by_date() {
        let times = [at(2024, 3, 1, 9), at(2024, 3, 1, 18), at(2024, 3, 3, 12)];
        let points = cumulative_by_date(&times);

        assert_eq!(
            points,
            vec![
                GrowthPoint { date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), total: 2 },
                GrowthPoint { date: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(), total: 3 },
            ]
        );
    }

    #[test]
    fn test_cumulative_by_date_empty() {
        assert!(cumulative_by_date(&[]).is_empty());
    }

    #[test]
    fn test_standing_points() {
        let standing = Standing { wins: 4, losses: 2 };
        assert_eq!(standing.points(), 12);
    }

    proptest! {
        #[test]
        fn prop_growth_is_strictly_increasing_and_ends_at_total(
            offsets in proptest::collection::vec(0i64..(60 * 24 * 90), 0..50)
        ) {
            let base = at(2024, 1, 1, 0);
            let times: Vec<_> = offsets
                .iter()
                .map(|m| base + chrono::Duration::minutes(*m))
                .collect();
            let points = cumulative_by_date(&times);

            for pair in points.windows(2) {
                prop_assert!(pair[0].date < pair[1].date);
                prop_assert!(pair[0].total < pair[1].total);
            }
            prop_assert_eq!(points.last().map(|p| p.total).unwrap_or(0), times.len() as i64);
        }
    }
}
