//! Domain Services
//!
//! Pure computations behind the summary and statistics endpoints.

use chrono::{DateTime, Utc};

/// Percentage of the goal reached, rounded to one decimal
///
/// Not capped: an over-funded cagnotte reports more than 100.
pub fn progress_percent(total_raised: i64, goal_amount: i64) -> f64 {
    if goal_amount <= 0 {
        return 0.0;
    }
    let percent = total_raised as f64 * 100.0 / goal_amount as f64;
    (percent * 10.0).round() / 10.0
}

/// Donation amount ranges used by the statistics endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmountBucket {
    Under1000,
    From1000To4999,
    From5000To9999,
    From10000To49999,
    From50000,
}

impl AmountBucket {
    /// All buckets, smallest amounts first
    pub const ALL: [AmountBucket; 5] = [
        AmountBucket::Under1000,
        AmountBucket::From1000To4999,
        AmountBucket::From5000To9999,
        AmountBucket::From10000To49999,
        AmountBucket::From50000,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AmountBucket::Under1000 => "<1000",
            AmountBucket::From1000To4999 => "1000-4999",
            AmountBucket::From5000To9999 => "5000-9999",
            AmountBucket::From10000To49999 => "10000-49999",
            AmountBucket::From50000 => ">=50000",
        }
    }

    /// Inclusive lower bound
    pub fn lower_bound(&self) -> i64 {
        match self {
            AmountBucket::Under1000 => i64::MIN,
            AmountBucket::From1000To4999 => 1_000,
            AmountBucket::From5000To9999 => 5_000,
            AmountBucket::From10000To49999 => 10_000,
            AmountBucket::From50000 => 50_000,
        }
    }

    pub fn for_amount(amount: i64) -> Self {
        Self::ALL
            .into_iter()
            .rev()
            .find(|bucket| amount >= bucket.lower_bound())
            .unwrap_or(AmountBucket::Under1000)
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.label() == label)
    }

    /// SQL `CASE` expression mapping `column` to a bucket label
    ///
    /// Generated from the same bounds as [`AmountBucket::for_amount`] so the
    /// database and the Rust side never disagree.
    pub fn sql_case(column: &str) -> String {
        let mut sql = String::from("CASE");
        for bucket in Self::ALL.into_iter().rev() {
            if bucket == AmountBucket::Under1000 {
                continue;
            }
            sql.push_str(&format!(
                " WHEN {column} >= {} THEN '{}'",
                bucket.lower_bound(),
                bucket.label()
            ));
        }
        sql.push_str(&format!(" ELSE '{}' END", AmountBucket::Under1000.label()));
        sql
    }
}

/// Donation count for one bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketCount {
    pub bucket: AmountBucket,
    pub count: i64,
}

/// Every bucket in order, zero where the database returned no row
pub fn fill_buckets(rows: impl IntoIterator<Item = (String, i64)>) -> Vec<BucketCount> {
    let mut counts = AmountBucket::ALL.map(|bucket| BucketCount { bucket, count: 0 });

    for (label, count) in rows {
        match AmountBucket::from_label(&label) {
            Some(bucket) => {
                if let Some(slot) = counts.iter_mut().find(|c| c.bucket == bucket) {
                    slot.count += count;
                }
            }
            None => tracing::warn!(label = %label, "Unknown donation bucket label"),
        }
    }

    counts.to_vec()
}

/// Donations summed over one week
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyTotal {
    pub week_start: DateTime<Utc>,
    pub amount: i64,
}

/// Weekly total with the running sum up to and including that week
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyPoint {
    pub week_start: DateTime<Utc>,
    pub amount: i64,
    pub cumulative: i64,
}

/// Running totals in chronological order, whatever order the input has
pub fn cumulative_series(mut weekly: Vec<WeeklyTotal>) -> Vec<WeeklyPoint> {
    weekly.sort_by_key(|w| w.week_start);

    let mut cumulative = 0i64;
    weekly
        .into_iter()
        .map(|w| {
            cumulative = cumulative.saturating_add(w.amount);
            WeeklyPoint {
                week_start: w.week_start,
                amount: w.amount,
                cumulative,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_progress_percent_rounding() {
        assert_eq!(progress_percent(0, 1_000), 0.0);
        assert_eq!(progress_percent(1, 3), 33.3);
        assert_eq!(progress_percent(2, 3), 66.7);
        assert_eq!(progress_percent(1_500, 1_000), 150.0);
        assert_eq!(progress_percent(10, 0), 0.0);
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(AmountBucket::for_amount(1), AmountBucket::Under1000);
        assert_eq!(AmountBucket::for_amount(999), AmountBucket::Under1000);
        assert_eq!(AmountBucket::for_amount(1_000), AmountBucket::From1000To4999);
        assert_eq!(AmountBucket::for_amount(4_999), AmountBucket::From1000To4999);
        assert_eq!(AmountBucket::for_amount(5_000), AmountBucket::From5000To9999);
        assert_eq!(AmountBucket::for_amount(9_999), AmountBucket::From5000To9999);
        assert_eq!(AmountBucket::for_amount(10_000), AmountBucket::From10000To49999);
        assert_eq!(AmountBucket::for_amount(49_999), AmountBucket::From10000To49999);
        assert_eq!(AmountBucket::for_amount(50_000), AmountBucket::From50000);
        assert_eq!(AmountBucket::for_amount(1_000_000), AmountBucket::From50000);
    }

    #[test]
    fn test_label_roundtrip() {
        for bucket in AmountBucket::ALL {
            assert_eq!(AmountBucket::from_label(bucket.label()), Some(bucket));
        }
        assert_eq!(AmountBucket::from_label("huge"), None);
    }

    #[test]
    fn test_sql_case() {
        assert_eq!(
            AmountBucket::sql_case("amount"),
            "CASE WHEN amount >= 50000 THEN '>=50000' \
             WHEN amount >= 10000 THEN '10000-49999' \
             WHEN amount >= 5000 THEN '5000-9999' \
             WHEN amount >= 1000 THEN '1000-4999' \
             ELSE '<1000' END"
        );
    }

    #[test]
    fn test_fill_buckets() {
        let filled = fill_buckets(vec![
            (">=50000".to_string(), 2),
            ("<1000".to_string(), 5),
            ("bogus".to_string(), 9),
        ]);

        let counts: Vec<(&str, i64)> = filled.iter().map(|c| (c.bucket.label(), c.count)).collect();
        assert_eq!(
            counts,
            vec![
                ("<1000", 5),
                ("1000-4999", 0),
                ("5000-9999", 0),
                ("10000-49999", 0),
                (">=50000", 2),
            ]
        );
    }

    #[test]
    fn test_cumulative_series_sorts_then_accumulates() {
        let week0 = Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
        let week1 = week0 + Duration::weeks(1);
        let week3 = week0 + Duration::weeks(3);

        let series = cumulative_series(vec![
            WeeklyTotal { week_start: week3, amount: 500 },
            WeeklyTotal { week_start: week0, amount: 1_000 },
            WeeklyTotal { week_start: week1, amount: 2_500 },
        ]);

        let points: Vec<(DateTime<Utc>, i64, i64)> = series
            .iter()
            .map(|p| (p.week_start, p.amount, p.cumulative))
            .collect();
        assert_eq!(
            points,
            vec![(week0, 1_000, 1_000), (week1, 2_500, 3_500), (week3, 500, 4_000)]
        );
        assert!(cumulative_series(Vec::new()).is_empty());
    }
}
