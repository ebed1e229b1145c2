use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::model::{CampaignTable, CategoryColumn, NumericColumn};

// ---------------------------------------------------------------------------
// Aggregation functions
//
// Every function here is total: an empty table yields 0, an empty
// collection, or NaN cells, never a panic.
// ---------------------------------------------------------------------------

/// Sum of `monthly_sales`; 0 for an empty table.
pub fn total_sales(table: &CampaignTable) -> f64 {
    // `Sum for f64` starts at -0.0, which would print as "-0.0" when empty.
    table.iter().fold(0.0, |acc, r| acc + r.monthly_sales)
}

/// Mean of `value` for each distinct `group` present in the table.
pub fn mean_by_group(
    table: &CampaignTable,
    group: CategoryColumn,
    value: NumericColumn,
) -> BTreeMap<String, f64> {
    let mut acc: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for rec in table {
        let entry = acc.entry(group.value(rec).to_string()).or_insert((0.0, 0));
        entry.0 += value.value(rec);
        entry.1 += 1;
    }
    acc.into_iter()
        .map(|(key, (sum, count))| (key, sum / count as f64))
        .collect()
}

/// Per-group sums of `value` in first-encountered group order.
pub fn sum_by_group(
    table: &CampaignTable,
    group: CategoryColumn,
    value: NumericColumn,
) -> Vec<(String, f64)> {
    let mut sums: Vec<(String, f64)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for rec in table {
        let key = group.value(rec);
        let slot = *slots.entry(key).or_insert_with(|| {
            sums.push((key.to_string(), 0.0));
            sums.len() - 1
        });
        sums[slot].1 += value.value(rec);
    }
    sums
}

/// The `n` groups with the largest summed `value`, largest first.
///
/// Ties keep the order in which groups first appear in the table (the sort
/// is stable). Names are grouped verbatim, so spelling variants of one
/// influencer are counted separately.
pub fn top_n(
    table: &CampaignTable,
    group: CategoryColumn,
    value: NumericColumn,
    n: usize,
) -> Vec<(String, f64)> {
    let mut sums = sum_by_group(table, group, value);
    sums.sort_by(|a, b| b.1.total_cmp(&a.1));
    sums.truncate(n);
    sums
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Square, symmetric matrix of pairwise Pearson coefficients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<NumericColumn>,
    /// Row-major, `columns.len()` × `columns.len()`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }
}

/// Pearson correlation between each pair of `columns`.
///
/// A column with zero variance (or a table with fewer than two rows) has
/// NaN in its whole row and column, diagonal included.
pub fn correlation_matrix(table: &CampaignTable, columns: &[NumericColumn]) -> CorrelationMatrix {
    let data: Vec<Vec<f64>> = columns.iter().map(|&c| table.column(c)).collect();
    let k = columns.len();
    let mut values = vec![vec![f64::NAN; k]; k];

    for i in 0..k {
        for j in i..k {
            let r = if i == j {
                // Guard the diagonal against rounding: exactly 1 unless degenerate.
                if pearson(&data[i], &data[i]).is_nan() {
                    f64::NAN
                } else {
                    1.0
                }
            } else {
                pearson(&data[i], &data[j])
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    }
}

/// Pearson coefficient of two equal-length samples, NaN when undefined.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return f64::NAN;
    }
    // Rounding in the mean leaves a tiny non-zero spread for constant
    // non-integral samples, so test for a constant sample directly.
    let (xs, ys) = (&xs[..n], &ys[..n]);
    if is_constant(xs) || is_constant(ys) {
        return f64::NAN;
    }
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|&v| v == values[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter_table, FilterSpec};
    use crate::data::model::tests::{record, sample_table};
    use crate::data::model::CampaignRecord;

    fn spec(platforms: &[&str], min: f64, max: f64) -> FilterSpec {
        FilterSpec::new(
            platforms.iter().map(|s| s.to_string()),
            ["Reel", "Story"].map(String::from),
            min,
            max,
        )
    }

    #[test]
    fn instagram_only_scenario() {
        let filtered = filter_table(&sample_table(), &spec(&["Instagram"], 0.0, 1000.0));
        assert_eq!(total_sales(&filtered), 150.0);

        let means = mean_by_group(&filtered, CategoryColumn::ContentType, NumericColumn::MonthlySales);
        let expected: BTreeMap<String, f64> =
            [("Reel".to_string(), 100.0), ("Story".to_string(), 50.0)].into();
        assert_eq!(means, expected);
    }

    #[test]
    fn narrowed_range_scenario() {
        let filtered = filter_table(&sample_table(), &spec(&["Instagram"], 60.0, 1000.0));
        assert_eq!(total_sales(&filtered), 100.0);
        assert_eq!(
            top_n(&filtered, CategoryColumn::Platform, NumericColumn::MonthlySales, 5),
            vec![("Instagram".to_string(), 100.0)]
        );
    }

    #[test]
    fn empty_selection_scenario() {
        let filtered = filter_table(&sample_table(), &spec(&[], 0.0, 1000.0));
        assert_eq!(total_sales(&filtered), 0.0);
        assert!(!total_sales(&filtered).is_sign_negative());
        assert!(mean_by_group(&filtered, CategoryColumn::ContentType, NumericColumn::MonthlySales).is_empty());
        assert!(top_n(&filtered, CategoryColumn::Platform, NumericColumn::MonthlySales, 3).is_empty());

        let corr = correlation_matrix(&filtered, &NumericColumn::ALL);
        assert_eq!(corr.len(), 6);
        assert!(corr.values.iter().flatten().all(|v| v.is_nan()));
    }

    #[test]
    fn total_matches_direct_scan() {
        let table = sample_table();
        let s = spec(&["Instagram", "TikTok"], 75.0, 300.0);
        let direct: f64 = table
            .iter()
            .filter(|r| s.matches(r))
            .map(|r| r.monthly_sales)
            .sum();
        assert_eq!(total_sales(&filter_table(&table, &s)), direct);
    }

    #[test]
    fn top_n_sorts_truncates_and_breaks_ties_by_first_seen() {
        let named = |name: &str, sales: f64| CampaignRecord {
            influencer_name: name.to_string(),
            ..record("Instagram", "Reel", sales)
        };
        let table = CampaignTable::from_records(vec![
            named("zoe", 40.0),
            named("amy", 70.0),
            named("zoe", 30.0),
            named("max", 10.0),
            named("bea", 70.0),
        ]);

        let top = top_n(&table, CategoryColumn::InfluencerName, NumericColumn::MonthlySales, 3);
        assert_eq!(
            top,
            vec![
                ("zoe".to_string(), 70.0),
                ("amy".to_string(), 70.0),
                ("bea".to_string(), 70.0),
            ]
        );

        for (name, sum) in &top {
            let direct: f64 = table
                .iter()
                .filter(|r| &r.influencer_name == name)
                .map(|r| r.monthly_sales)
                .sum();
            assert_eq!(*sum, direct);
        }

        assert_eq!(top_n(&table, CategoryColumn::InfluencerName, NumericColumn::MonthlySales, 10).len(), 4);
        assert!(top_n(&table, CategoryColumn::InfluencerName, NumericColumn::MonthlySales, 0).is_empty());
    }

    #[test]
    fn name_variants_are_not_merged() {
        let table = CampaignTable::from_records(vec![
            CampaignRecord { influencer_name: "Sara K".into(), ..record("Instagram", "Reel", 10.0) },
            CampaignRecord { influencer_name: "sara k".into(), ..record("Instagram", "Reel", 20.0) },
        ]);
        assert_eq!(top_n(&table, CategoryColumn::InfluencerName, NumericColumn::MonthlySales, 10).len(), 2);
    }

    #[test]
    fn correlation_is_symmetric_with_unit_diagonal() {
        let rows = [(1u64, 10.0, 3.0), (2, 20.0, 1.0), (3, 35.0, 4.0), (4, 38.0, 1.5)];
        let table = CampaignTable::from_records(
            rows.iter()
                .map(|&(clicks, sales, spend)| CampaignRecord {
                    clicks,
                    ad_spend: spend,
                    ..record("Instagram", "Reel", sales)
                })
                .collect(),
        );
        let cols = [NumericColumn::Clicks, NumericColumn::MonthlySales, NumericColumn::AdSpend];
        let corr = correlation_matrix(&table, &cols);

        for i in 0..cols.len() {
            assert!((corr.get(i, i) - 1.0).abs() < 1e-12);
            for j in 0..cols.len() {
                assert_eq!(corr.get(i, j), corr.get(j, i));
                assert!(corr.get(i, j).abs() <= 1.0);
            }
        }
        assert!(corr.get(0, 1) > 0.9);
    }

    #[test]
    fn constant_column_correlates_as_nan() {
        // `followers` is constant in the sample table.
        let corr = correlation_matrix(
            &sample_table(),
            &[NumericColumn::Followers, NumericColumn::MonthlySales],
        );
        assert!(corr.get(0, 0).is_nan());
        assert!(corr.get(0, 1).is_nan());
        assert!(corr.get(1, 0).is_nan());
        assert_eq!(corr.get(1, 1), 1.0);
    }

    #[test]
    fn constant_fractional_column_correlates_as_nan() {
        let table = CampaignTable::from_records(
            [100.0, 250.0, 400.0]
                .iter()
                .map(|&sales| CampaignRecord {
                    engagement_rate: 0.1,
                    ..record("Instagram", "Reel", sales)
                })
                .collect(),
        );
        let corr = correlation_matrix(
            &table,
            &[NumericColumn::EngagementRate, NumericColumn::MonthlySales],
        );
        assert!(corr.get(0, 0).is_nan());
        assert!(corr.get(0, 1).is_nan());
        assert!(corr.get(1, 0).is_nan());
        assert_eq!(corr.get(1, 1), 1.0);
        assert!(pearson(&[0.1, 0.1, 0.1], &[1.0, 2.0, 3.0]).is_nan());
    }

    #[test]
    fn pearson_of_exact_inverse_is_minus_one() {
        let r = pearson(&[1.0, 2.0, 3.0], &[6.0, 4.0, 2.0]);
        assert!((r + 1.0).abs() < 1e-12);
    }
}
