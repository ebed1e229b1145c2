use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CampaignRecord – one row of the campaign CSV
// ---------------------------------------------------------------------------

/// A single influencer campaign (one row of the source CSV).
///
/// Field order is the column order used when exporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub platform: String,
    pub content_type: String,
    /// Free text, not guaranteed unique and never normalised.
    pub influencer_name: String,
    pub followers: u64,
    /// Stored as found in the file; fraction vs percentage is not known.
    pub engagement_rate: f64,
    pub clicks: u64,
    pub impressions: u64,
    pub ad_spend: f64,
    pub monthly_sales: f64,
}

// ---------------------------------------------------------------------------
// Column selectors
// ---------------------------------------------------------------------------

/// Text columns usable as a group-by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryColumn {
    Platform,
    ContentType,
    InfluencerName,
}

impl CategoryColumn {
    pub fn name(self) -> &'static str {
        match self {
            CategoryColumn::Platform => "platform",
            CategoryColumn::ContentType => "content_type",
            CategoryColumn::InfluencerName => "influencer_name",
        }
    }

    pub fn value(self, record: &CampaignRecord) -> &str {
        match self {
            CategoryColumn::Platform => &record.platform,
            CategoryColumn::ContentType => &record.content_type,
            CategoryColumn::InfluencerName => &record.influencer_name,
        }
    }
}

/// Numeric columns usable as an aggregation value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericColumn {
    Followers,
    EngagementRate,
    Clicks,
    Impressions,
    AdSpend,
    MonthlySales,
}

impl NumericColumn {
    /// Every numeric column, in schema order.
    pub const ALL: [NumericColumn; 6] = [
        NumericColumn::Followers,
        NumericColumn::EngagementRate,
        NumericColumn::Clicks,
        NumericColumn::Impressions,
        NumericColumn::AdSpend,
        NumericColumn::MonthlySales,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::Followers => "followers",
            NumericColumn::EngagementRate => "engagement_rate",
            NumericColumn::Clicks => "clicks",
            NumericColumn::Impressions => "impressions",
            NumericColumn::AdSpend => "ad_spend",
            NumericColumn::MonthlySales => "monthly_sales",
        }
    }

    pub fn value(self, record: &CampaignRecord) -> f64 {
        match self {
            NumericColumn::Followers => record.followers as f64,
            NumericColumn::EngagementRate => record.engagement_rate,
            NumericColumn::Clicks => record.clicks as f64,
            NumericColumn::Impressions => record.impressions as f64,
            NumericColumn::AdSpend => record.ad_spend,
            NumericColumn::MonthlySales => record.monthly_sales,
        }
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for CategoryColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// CampaignTable – the complete loaded (or filtered) dataset
// ---------------------------------------------------------------------------

/// An ordered, immutable-by-convention sequence of campaign records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignTable {
    pub records: Vec<CampaignRecord>,
}

impl CampaignTable {
    pub fn from_records(records: Vec<CampaignRecord>) -> Self {
        CampaignTable { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CampaignRecord> {
        self.records.iter()
    }

    /// All values of a numeric column, in record order.
    pub fn column(&self, column: NumericColumn) -> Vec<f64> {
        self.records.iter().map(|r| column.value(r)).collect()
    }

    /// The legal filter domain observed in this table.
    pub fn domain(&self) -> FilterDomain {
        FilterDomain::from_table(self)
    }
}

impl<'a> IntoIterator for &'a CampaignTable {
    type Item = &'a CampaignRecord;
    type IntoIter = std::slice::Iter<'a, CampaignRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// FilterDomain – what the filter widgets may offer
// ---------------------------------------------------------------------------

/// Distinct categories (first-encountered order) and the observed sales range.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterDomain {
    pub platforms: Vec<String>,
    pub content_types: Vec<String>,
    pub sales_min: f64,
    pub sales_max: f64,
}

impl FilterDomain {
    pub fn from_table(table: &CampaignTable) -> Self {
        let mut platforms: Vec<String> = Vec::new();
        let mut content_types: Vec<String> = Vec::new();
        let mut sales_min = f64::INFINITY;
        let mut sales_max = f64::NEG_INFINITY;

        for rec in table {
            if !platforms.contains(&rec.platform) {
                platforms.push(rec.platform.clone());
            }
            if !content_types.contains(&rec.content_type) {
                content_types.push(rec.content_type.clone());
            }
            sales_min = sales_min.min(rec.monthly_sales);
            sales_max = sales_max.max(rec.monthly_sales);
        }

        // An empty table has no observed range; collapse to zero.
        if table.is_empty() {
            sales_min = 0.0;
            sales_max = 0.0;
        }

        FilterDomain {
            platforms,
            content_types,
            sales_min,
            sales_max,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(platform: &str, content_type: &str, sales: f64) -> CampaignRecord {
        CampaignRecord {
            platform: platform.to_string(),
            content_type: content_type.to_string(),
            influencer_name: format!("{platform}_{content_type}"),
            followers: 1_000,
            engagement_rate: 0.05,
            clicks: 100,
            impressions: 5_000,
            ad_spend: 250.0,
            monthly_sales: sales,
        }
    }

    /// The three-row table used throughout the dashboard's examples.
    pub(crate) fn sample_table() -> CampaignTable {
        CampaignTable::from_records(vec![
            record("Instagram", "Reel", 100.0),
            record("TikTok", "Reel", 200.0),
            record("Instagram", "Story", 50.0),
        ])
    }

    #[test]
    fn domain_keeps_first_encountered_order() {
        let domain = sample_table().domain();
        assert_eq!(domain.platforms, vec!["Instagram", "TikTok"]);
        assert_eq!(domain.content_types, vec!["Reel", "Story"]);
        assert_eq!(domain.sales_min, 50.0);
        assert_eq!(domain.sales_max, 200.0);
    }

    #[test]
    fn domain_of_empty_table_is_zero_range() {
        let domain = CampaignTable::default().domain();
        assert!(domain.platforms.is_empty());
        assert_eq!((domain.sales_min, domain.sales_max), (0.0, 0.0));
    }

    #[test]
    fn numeric_column_reads_integer_fields_as_float() {
        let rec = record("YouTube", "Video", 10.0);
        assert_eq!(NumericColumn::Followers.value(&rec), 1_000.0);
        assert_eq!(NumericColumn::MonthlySales.value(&rec), 10.0);
        assert_eq!(CategoryColumn::ContentType.value(&rec), "Video");
    }
}
