use std::collections::BTreeSet;

use super::model::{CampaignRecord, CampaignTable, FilterDomain};

// ---------------------------------------------------------------------------
// Filter predicate: selected categories plus an inclusive sales range
// ---------------------------------------------------------------------------

/// User-selected predicates narrowing the campaign table.
///
/// An empty category set selects nothing (it is not "no filter").
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub platforms: BTreeSet<String>,
    pub content_types: BTreeSet<String>,
    sales_min: f64,
    sales_max: f64,
}

impl FilterSpec {
    /// Build a spec; the bounds are swapped if given out of order so that
    /// `min <= max` always holds.
    pub fn new(
        platforms: impl IntoIterator<Item = String>,
        content_types: impl IntoIterator<Item = String>,
        sales_min: f64,
        sales_max: f64,
    ) -> Self {
        let mut spec = FilterSpec {
            platforms: platforms.into_iter().collect(),
            content_types: content_types.into_iter().collect(),
            sales_min: 0.0,
            sales_max: 0.0,
        };
        spec.set_sales_range(sales_min, sales_max);
        spec
    }

    /// Everything selected over the full observed sales range.
    pub fn select_all(domain: &FilterDomain) -> Self {
        FilterSpec::new(
            domain.platforms.iter().cloned(),
            domain.content_types.iter().cloned(),
            domain.sales_min,
            domain.sales_max,
        )
    }

    pub fn sales_min(&self) -> f64 {
        self.sales_min
    }

    pub fn sales_max(&self) -> f64 {
        self.sales_max
    }

    pub fn set_sales_range(&mut self, min: f64, max: f64) {
        if min <= max {
            self.sales_min = min;
            self.sales_max = max;
        } else {
            self.sales_min = max;
            self.sales_max = min;
        }
    }

    /// Move the lower bound, dragging the upper bound along if it is crossed.
    pub fn set_sales_min(&mut self, min: f64) {
        self.sales_min = min;
        if self.sales_max < min {
            self.sales_max = min;
        }
    }

    /// Move the upper bound, dragging the lower bound along if it is crossed.
    pub fn set_sales_max(&mut self, max: f64) {
        self.sales_max = max;
        if self.sales_min > max {
            self.sales_min = max;
        }
    }

    /// Whether a single record passes every predicate.
    pub fn matches(&self, record: &CampaignRecord) -> bool {
        self.platforms.contains(&record.platform)
            && self.content_types.contains(&record.content_type)
            && self.sales_min <= record.monthly_sales
            && record.monthly_sales <= self.sales_max
    }
}

/// Return the records of `table` that pass `spec`, in their original order.
///
/// No match yields an empty table, never an error.
pub fn filter_table(table: &CampaignTable, spec: &FilterSpec) -> CampaignTable {
    CampaignTable::from_records(
        table
            .iter()
            .filter(|rec| spec.matches(rec))
            .cloned()
            .collect(),
    )
}
