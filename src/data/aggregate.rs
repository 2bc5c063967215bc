use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use super::model::Transaction;

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Headline numbers for the metric cards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub count: usize,
    /// Sum of total value, nulls skipped.
    pub total_value: f64,
    /// Sum of metric tons, nulls skipped.
    pub total_volume: f64,
    /// Mean of the non-null value-per-kg cells; `None` when there are none.
    pub avg_value_per_kg: Option<f64>,
}

pub fn summarize(records: &[&Transaction]) -> Metrics {
    let total_value: f64 = records.iter().filter_map(|t| t.total_value).sum();
    let total_volume: f64 = records.iter().filter_map(|t| t.metric_tons).sum();

    let (sum, n) = records
        .iter()
        .filter_map(|t| t.value_per_kg)
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));

    Metrics {
        count: records.len(),
        total_value,
        total_volume,
        avg_value_per_kg: (n > 0).then(|| sum / n as f64),
    }
}

// ---------------------------------------------------------------------------
// Grouped breakdowns
// ---------------------------------------------------------------------------

/// Group `records` by `group`, sum `value` per group, and keep the `n`
/// largest sums in descending order.
///
/// Records whose key is `None` are skipped; a `None` value adds nothing to
/// its group. Equal sums keep the order in which their groups first appeared.
pub fn top_n_by<'a, K, V>(records: &[&'a Transaction], group: K, value: V, n: usize) -> Vec<(String, f64)>
where
    K: Fn(&'a Transaction) -> Option<&'a str>,
    V: Fn(&Transaction) -> Option<f64>,
{
    let mut order: Vec<(&'a str, f64)> = Vec::new();
    let mut slot: HashMap<&'a str, usize> = HashMap::new();

    for &t in records {
        let Some(key) = group(t) else {
            continue;
        };
        let idx = *slot.entry(key).or_insert_with(|| {
            order.push((key, 0.0));
            order.len() - 1
        });
        order[idx].1 += value(t).unwrap_or(0.0);
    }

    // Stable sort keeps first-seen order among ties.
    order.sort_by(|a, b| b.1.total_cmp(&a.1));
    order
        .into_iter()
        .take(n)
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Frequency variant of [`top_n_by`]: each record counts as one.
pub fn top_n_counts<'a, K>(records: &[&'a Transaction], group: K, n: usize) -> Vec<(String, usize)>
where
    K: Fn(&'a Transaction) -> Option<&'a str>,
{
    top_n_by(records, group, |_| Some(1.0), n)
        .into_iter()
        .map(|(k, c)| (k, c as usize))
        .collect()
}

/// One calendar day of the time series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub total_value: f64,
    pub total_volume: f64,
}

/// Per-day value and volume sums, oldest first. Undated records are skipped.
pub fn daily_series(records: &[&Transaction]) -> Vec<DailyPoint> {
    let mut days: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for t in records {
        let Some(date) = t.date else {
            continue;
        };
        let entry = days.entry(date).or_insert((0.0, 0.0));
        entry.0 += t.total_value.unwrap_or(0.0);
        entry.1 += t.metric_tons.unwrap_or(0.0);
    }
    days.into_iter()
        .map(|(date, (total_value, total_volume))| DailyPoint {
            date,
            total_value,
            total_volume,
        })
        .collect()
}

/// Chart inputs for one dashboard view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Breakdowns {
    pub buyers_by_volume: Vec<(String, f64)>,
    pub sellers_by_value: Vec<(String, f64)>,
    pub category_counts: Vec<(String, usize)>,
    pub country_counts: Vec<(String, usize)>,
    pub daily: Vec<DailyPoint>,
}

impl Breakdowns {
    pub const TOP_BUYERS: usize = 10;
    pub const TOP_SELLERS: usize = 10;
    pub const TOP_CATEGORIES: usize = 5;
    pub const TOP_COUNTRIES: usize = 10;

    pub fn compute(records: &[&Transaction]) -> Self {
        Breakdowns {
            buyers_by_volume: top_n_by(
                records,
                |t| Some(t.buyer.as_str()),
                |t| t.metric_tons,
                Self::TOP_BUYERS,
            ),
            sellers_by_value: top_n_by(
                records,
                |t| t.seller.as_deref(),
                |t| t.total_value,
                Self::TOP_SELLERS,
            ),
            category_counts: top_n_counts(records, |t| t.category.as_deref(), Self::TOP_CATEGORIES),
            country_counts: top_n_counts(
                records,
                |t| t.country_of_origin.as_deref(),
                Self::TOP_COUNTRIES,
            ),
            daily: daily_series(records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::sample_transaction;

    fn with_tons(buyer: &str, tons: Option<f64>) -> Transaction {
        let mut t = sample_transaction(buyer, "854442");
        t.metric_tons = tons;
        t
    }

    #[test]
    fn summary_of_nothing() {
        let m = summarize(&[]);
        assert_eq!(
            m,
            Metrics { count: 0, total_value: 0.0, total_volume: 0.0, avg_value_per_kg: None }
        );
    }

    #[test]
    fn summary_skips_nulls() {
        let mut a = with_tons("A", Some(2.0));
        a.total_value = Some(100.0);
        a.value_per_kg = Some(4.0);
        let mut b = with_tons("B", None);
        b.total_value = Some(50.0);
        b.value_per_kg = None;
        let mut c = with_tons("C", Some(1.5));
        c.value_per_kg = Some(2.0);

        let m = summarize(&[&a, &b, &c]);
        assert_eq!(m.count, 3);
        assert_eq!(m.total_value, 150.0);
        assert_eq!(m.total_volume, 3.5);
        assert_eq!(m.avg_value_per_kg, Some(3.0));
    }

    #[test]
    fn top_n_orders_by_sum() {
        let rows = [
            with_tons("A", Some(60.0)),
            with_tons("B", Some(50.0)),
            with_tons("C", Some(150.0)),
            with_tons("A", Some(40.0)),
        ];
        let refs: Vec<&Transaction> = rows.iter().collect();
        let top = top_n_by(&refs, |t| Some(t.buyer.as_str()), |t| t.metric_tons, 2);
        assert_eq!(top, vec![("C".to_string(), 150.0), ("A".to_string(), 100.0)]);
    }

    #[test]
    fn top_n_ties_keep_first_seen() {
        let rows = [
            with_tons("Z", Some(10.0)),
            with_tons("M", Some(10.0)),
            with_tons("A", Some(10.0)),
            with_tons("Q", None),
        ];
        let refs: Vec<&Transaction> = rows.iter().collect();
        let top = top_n_by(&refs, |t| Some(t.buyer.as_str()), |t| t.metric_tons, 10);
        let names: Vec<&str> = top.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["Z", "M", "A", "Q"]);
        assert_eq!(top[3].1, 0.0);
    }

    #[test]
    fn counts_skip_null_keys() {
        let mut rows = vec![with_tons("A", None), with_tons("B", None), with_tons("C", None)];
        rows[0].country_of_origin = Some("Peru".into());
        rows[1].country_of_origin = Some("Peru".into());
        let refs: Vec<&Transaction> = rows.iter().collect();
        let counts = top_n_counts(&refs, |t| t.country_of_origin.as_deref(), 10);
        assert_eq!(counts, vec![("Peru".to_string(), 2)]);
    }

    #[test]
    fn daily_series_is_chronological() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d);
        let mut rows = vec![with_tons("A", Some(1.0)), with_tons("B", Some(2.0)), with_tons("C", Some(4.0))];
        rows[0].date = day(9);
        rows[0].total_value = Some(10.0);
        rows[1].date = day(2);
        rows[2].date = day(9);
        rows[2].total_value = Some(5.0);
        let refs: Vec<&Transaction> = rows.iter().collect();

        let series = daily_series(&refs);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, day(2).unwrap());
        assert_eq!(series[0].total_value, 0.0);
        assert_eq!(series[1].total_value, 15.0);
        assert_eq!(series[1].total_volume, 5.0);
    }

    #[test]
    fn breakdowns_respect_limits() {
        let rows: Vec<Transaction> = (0..15)
            .map(|i| {
                let mut t = with_tons(&format!("Buyer {i:02}"), Some(i as f64));
                t.category = Some(format!("Cat {}", i % 7));
                t
            })
            .collect();
        let refs: Vec<&Transaction> = rows.iter().collect();
        let b = Breakdowns::compute(&refs);
        assert_eq!(b.buyers_by_volume.len(), Breakdowns::TOP_BUYERS);
        assert_eq!(b.buyers_by_volume[0].0, "Buyer 14");
        assert_eq!(b.category_counts.len(), Breakdowns::TOP_CATEGORIES);
        assert!(b.sellers_by_value.is_empty());
        assert!(b.daily.is_empty());
    }
}
