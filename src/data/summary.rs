use std::collections::BTreeMap;

use serde::Serialize;

use super::aggregate::{correlation_matrix, mean_by_group, top_n, total_sales, CorrelationMatrix};
use super::model::{CampaignTable, CategoryColumn, NumericColumn};
use super::stats::{
    box_spread_by_group, density_by_group, describe, histogram, ColumnSummary, GroupDensity, GroupSpread,
    Histogram,
};

/// Grid points per violin outline.
const DENSITY_POINTS: usize = 64;

/// Knobs for [`DashboardSummary::compute`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummarySettings {
    /// How many influencers the "top" chart shows.
    pub top_n: usize,
    /// Number of bins in the monthly-sales histogram.
    pub histogram_bins: usize,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            top_n: 10,
            histogram_bins: 30,
        }
    }
}

/// Everything the dashboard renders for one filtered table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub row_count: usize,
    pub total_sales: f64,
    pub engagement_by_platform: BTreeMap<String, f64>,
    pub top_influencers: Vec<(String, f64)>,
    pub correlation: CorrelationMatrix,
    pub sales_histogram: Histogram,
    pub sales_by_content_type: Vec<GroupSpread>,
    pub sales_by_platform: Vec<GroupSpread>,
    /// Violin outlines; drawing data only, left out of the JSON.
    #[serde(skip)]
    pub sales_density_by_platform: Vec<GroupDensity>,
    pub describe: Vec<ColumnSummary>,
}

impl DashboardSummary {
    /// Run every aggregation over `table` in one synchronous pass.
    pub fn compute(table: &CampaignTable, settings: SummarySettings) -> Self {
        DashboardSummary {
            row_count: table.len(),
            total_sales: total_sales(table),
            engagement_by_platform: mean_by_group(
                table,
                CategoryColumn::Platform,
                NumericColumn::EngagementRate,
            ),
            top_influencers: top_n(
                table,
                CategoryColumn::InfluencerName,
                NumericColumn::MonthlySales,
                settings.top_n,
            ),
            correlation: correlation_matrix(table, &NumericColumn::ALL),
            sales_histogram: histogram(
                &table.column(NumericColumn::MonthlySales),
                settings.histogram_bins,
            ),
            sales_by_content_type: box_spread_by_group(
                table,
                CategoryColumn::ContentType,
                NumericColumn::MonthlySales,
            ),
            sales_by_platform: box_spread_by_group(
                table,
                CategoryColumn::Platform,
                NumericColumn::MonthlySales,
            ),
            sales_density_by_platform: density_by_group(
                table,
                CategoryColumn::Platform,
                NumericColumn::MonthlySales,
                DENSITY_POINTS,
            ),
            describe: describe(table, &NumericColumn::ALL),
        }
    }

    /// Pretty JSON for the clipboard. NaN statistics become `null`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_table;

    #[test]
    fn summary_bundles_all_aggregations() {
        let summary = DashboardSummary::compute(&sample_table(), SummarySettings::default());
        assert_eq!(summary.row_count, 3);
        assert_eq!(summary.total_sales, 350.0);
        assert_eq!(summary.engagement_by_platform.len(), 2);
        assert_eq!(summary.top_influencers[0], ("TikTok_Reel".to_string(), 200.0));
        assert_eq!(summary.correlation.len(), NumericColumn::ALL.len());
        assert_eq!(summary.sales_histogram.total(), 3);
        assert_eq!(summary.sales_by_platform.len(), 2);
        assert_eq!(summary.sales_density_by_platform.len(), 1);
        assert_eq!(summary.describe.len(), NumericColumn::ALL.len());
    }

    #[test]
    fn summary_of_empty_table_serialises() {
        let summary = DashboardSummary::compute(&CampaignTable::default(), SummarySettings::default());
        assert_eq!(summary.total_sales, 0.0);
        assert!(summary.top_influencers.is_empty());

        let json = summary.to_json().expect("serialisable");
        assert!(json.contains("\"total_sales\": 0.0"));
        assert!(json.contains("\"monthly_sales\""));
        assert!(!json.contains("sales_density_by_platform"));
    }
}
