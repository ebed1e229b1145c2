/// Data layer: campaign table, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///   influencer_campaigns.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate → CampaignTable (cached per path)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSpec predicates → filtered CampaignTable
///   └──────────┘
///        │
///        ├──────────────► export   (filtered_influencer_data.csv)
///        ▼
///   ┌──────────────────────┐
///   │ aggregate / stats     │  totals, group means, top-N, correlation,
///   │ → DashboardSummary    │  histogram, box spreads, describe
///   └──────────────────────┘
/// ```

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
pub mod summary;
