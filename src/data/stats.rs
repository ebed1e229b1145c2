//! Descriptive statistics behind the charts: histogram, box-plot spreads,
//! kernel density outlines for violins, `describe()`-style column summaries
//! and least-squares trend lines.

use serde::Serialize;

use super::model::{CampaignTable, CategoryColumn, NumericColumn};

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width bins over the observed value range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// Left edge of the first bin.
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Centre of bin `i`, for plotting.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.start + (i as f64 + 0.5) * self.bin_width
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Bin `values` into `bins` equal-width buckets spanning `[min, max]`.
///
/// The maximum falls in the last bin. When every value is equal a single
/// unit-wide bin holds them all. No values (or `bins == 0`) gives no bins.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    if values.is_empty() || bins == 0 {
        return Histogram {
            start: 0.0,
            bin_width: 0.0,
            counts: Vec::new(),
        };
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range.abs() < f64::EPSILON {
        return Histogram {
            start: min - 0.5,
            bin_width: 1.0,
            counts: vec![values.len()],
        };
    }

    let bin_width = range / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - min) / bin_width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Histogram {
        start: min,
        bin_width,
        counts,
    }
}

// ---------------------------------------------------------------------------
// Quantiles and box-plot spreads
// ---------------------------------------------------------------------------

/// Quantile `q` in `[0, 1]` of an ascending slice, interpolating linearly
/// between closest ranks. NaN for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Five-number summary with Tukey whiskers (furthest points within 1.5 IQR).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSpread {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    /// Points beyond the whiskers.
    pub outliers: Vec<f64>,
}

impl BoxSpread {
    /// `None` for an empty sample.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sorted = sorted_copy(values);
        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let fence = 1.5 * (q3 - q1);
        let (lo_fence, hi_fence) = (q1 - fence, q3 + fence);

        let inside = sorted.iter().copied().filter(|&v| v >= lo_fence && v <= hi_fence);
        let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min);
        let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < lo_fence || v > hi_fence)
            .collect();

        Some(BoxSpread {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

/// A box spread labelled with its group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSpread {
    pub group: String,
    pub spread: BoxSpread,
}

/// One box per distinct `group`, in first-encountered order.
pub fn box_spread_by_group(
    table: &CampaignTable,
    group: CategoryColumn,
    value: NumericColumn,
) -> Vec<GroupSpread> {
    samples_by_group(table, group, value)
        .into_iter()
        .filter_map(|(group, vals)| {
            BoxSpread::from_values(&vals).map(|spread| GroupSpread { group, spread })
        })
        .collect()
}

/// Split `value` into one sample per `group`, in first-encountered order.
fn samples_by_group(
    table: &CampaignTable,
    group: CategoryColumn,
    value: NumericColumn,
) -> Vec<(String, Vec<f64>)> {
    let mut samples: Vec<(String, Vec<f64>)> = Vec::new();
    for rec in table {
        let key = group.value(rec);
        match samples.iter_mut().find(|(g, _)| g == key) {
            Some((_, vals)) => vals.push(value.value(rec)),
            None => samples.push((key.to_string(), vec![value.value(rec)])),
        }
    }
    samples
}

// ---------------------------------------------------------------------------
// Kernel density (violin outlines)
// ---------------------------------------------------------------------------

/// Gaussian kernel density sampled on an even grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Density {
    pub grid: Vec<f64>,
    pub values: Vec<f64>,
}

impl Density {
    pub fn peak(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

/// Silverman's rule of thumb. `None` when the sample has no spread.
pub fn silverman_bandwidth(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let sorted = sorted_copy(values);
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = (sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt();
    let iqr = quantile(&sorted, 0.75) - quantile(&sorted, 0.25);
    let spread = if iqr > 0.0 { std.min(iqr / 1.34) } else { std };

    let h = 0.9 * spread * (n as f64).powf(-0.2);
    (h > 0.0 && h.is_finite()).then_some(h)
}

/// Density of `values` at `points` grid positions spanning the sample
/// padded by two bandwidths on each side.
///
/// `None` for fewer than two points or a sample with no spread.
pub fn kde(values: &[f64], points: usize) -> Option<Density> {
    if points < 2 {
        return None;
    }
    let h = silverman_bandwidth(values)?;
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min) - 2.0 * h;
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 2.0 * h;
    let step = (hi - lo) / (points - 1) as f64;
    let norm = 1.0 / (values.len() as f64 * h * (2.0 * std::f64::consts::PI).sqrt());

    let grid: Vec<f64> = (0..points).map(|i| lo + step * i as f64).collect();
    let values = grid
        .iter()
        .map(|&y| {
            let sum: f64 = values
                .iter()
                .map(|&v| {
                    let z = (y - v) / h;
                    (-0.5 * z * z).exp()
                })
                .sum();
            sum * norm
        })
        .collect();

    Some(Density { grid, values })
}

/// A density labelled with its group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDensity {
    pub group: String,
    pub density: Density,
}

/// One density per distinct `group`; groups without spread are left out.
pub fn density_by_group(
    table: &CampaignTable,
    group: CategoryColumn,
    value: NumericColumn,
    points: usize,
) -> Vec<GroupDensity> {
    samples_by_group(table, group, value)
        .into_iter()
        .filter_map(|(group, vals)| kde(&vals, points).map(|density| GroupDensity { group, density }))
        .collect()
}

// ---------------------------------------------------------------------------
// describe()
// ---------------------------------------------------------------------------

/// Summary row for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: NumericColumn,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1); NaN below two rows.
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

/// Count, mean, std, min, quartiles and max of each column.
/// Every statistic except `count` is NaN for an empty table.
pub fn describe(table: &CampaignTable, columns: &[NumericColumn]) -> Vec<ColumnSummary> {
    columns
        .iter()
        .map(|&column| {
            let sorted = sorted_copy(&table.column(column));
            let count = sorted.len();
            let mean = if count == 0 {
                f64::NAN
            } else {
                sorted.iter().sum::<f64>() / count as f64
            };
            let std = if count < 2 {
                f64::NAN
            } else {
                let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
                (ss / (count - 1) as f64).sqrt()
            };

            ColumnSummary {
                column,
                count,
                mean,
                std,
                min: sorted.first().copied().unwrap_or(f64::NAN),
                p25: quantile(&sorted, 0.25),
                median: quantile(&sorted, 0.5),
                p75: quantile(&sorted, 0.75),
                max: sorted.last().copied().unwrap_or(f64::NAN),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Ordinary least squares
// ---------------------------------------------------------------------------

/// `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Least-squares line through the paired samples. `None` with fewer than
/// two points or when every `x` is equal.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (&x, &y) in xs[..n].iter().zip(&ys[..n]) {
        sxy += (x - mean_x) * (y - mean_y);
        sxx += (x - mean_x).powi(2);
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}
