use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::color::CategoryColors;
use crate::data::export::export_csv;
use crate::data::filter::{filter_table, FilterSpec};
use crate::data::loader::TableCache;
use crate::data::model::{CampaignTable, FilterDomain};
use crate::data::summary::{DashboardSummary, SummarySettings};

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    StrategyInsights,
    EngagementMetrics,
    DataTable,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Tab::Overview,
        Tab::StrategyInsights,
        Tab::EngagementMetrics,
        Tab::DataTable,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::StrategyInsights => "Strategy Insights",
            Tab::EngagementMetrics => "Engagement Metrics",
            Tab::DataTable => "Data Table & Summary",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Tables loaded so far, one per path.
    cache: TableCache,

    /// Path of the table currently shown.
    pub data_path: PathBuf,

    /// Full, immutable campaign table.
    pub table: Arc<CampaignTable>,

    /// Legal values for the filter widgets.
    pub domain: FilterDomain,

    /// Current filter selections.
    pub filters: FilterSpec,

    /// Records passing `filters` (recomputed on every change).
    pub filtered: CampaignTable,

    /// Aggregations over `filtered`.
    pub summary: DashboardSummary,

    pub settings: SummarySettings,

    pub platform_colors: CategoryColors,
    pub content_type_colors: CategoryColors,

    pub active_tab: Tab,

    /// Directory the export dialog starts in.
    pub export_dir: PathBuf,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load the startup table. Any load failure is returned to the caller.
    pub fn open(path: &Path, settings: SummarySettings) -> Result<Self> {
        let mut cache = TableCache::new();
        let table = cache
            .load(path)
            .with_context(|| format!("loading campaign data from {}", path.display()))?;
        Ok(Self::with_table(cache, path.to_path_buf(), table, settings))
    }

    fn with_table(
        cache: TableCache,
        data_path: PathBuf,
        table: Arc<CampaignTable>,
        settings: SummarySettings,
    ) -> Self {
        let domain = table.domain();
        let filters = FilterSpec::select_all(&domain);
        let filtered = filter_table(&table, &filters);
        let summary = DashboardSummary::compute(&filtered, settings);

        AppState {
            cache,
            data_path,
            platform_colors: CategoryColors::new(&domain.platforms),
            content_type_colors: CategoryColors::new(&domain.content_types),
            table,
            domain,
            filters,
            filtered,
            summary,
            settings,
            active_tab: Tab::default(),
            export_dir: PathBuf::from("."),
            status_message: None,
        }
    }

    /// Ingest a newly loaded table and reset filters and colours.
    fn set_table(&mut self, path: &Path, table: Arc<CampaignTable>) {
        self.domain = table.domain();
        self.filters = FilterSpec::select_all(&self.domain);
        self.platform_colors = CategoryColors::new(&self.domain.platforms);
        self.content_type_colors = CategoryColors::new(&self.domain.content_types);
        self.table = table;
        self.data_path = path.to_path_buf();
        self.status_message = None;
        self.refilter();
    }

    /// Switch to the table at `path`, using the cached copy if there is one.
    /// On failure the current table stays and the error is shown.
    pub fn open_path(&mut self, path: &Path) {
        match self.cache.load(path) {
            Ok(table) => self.set_table(path, table),
            Err(e) => self.report_error("Failed to load file", &e),
        }
    }

    /// Re-read the current file from disk.
    pub fn reload(&mut self) {
        let path = self.data_path.clone();
        match self.cache.reload(&path) {
            Ok(table) => self.set_table(&path, table),
            Err(e) => self.report_error("Failed to reload file", &e),
        }
    }

    /// Recompute the filtered table and every aggregation.
    pub fn refilter(&mut self) {
        self.filtered = filter_table(&self.table, &self.filters);
        self.summary = DashboardSummary::compute(&self.filtered, self.settings);
        log::debug!(
            "Filter applied: {} of {} campaigns visible",
            self.filtered.len(),
            self.table.len()
        );
    }

    /// Toggle a single platform in the filter.
    pub fn toggle_platform(&mut self, platform: &str) {
        toggle(&mut self.filters.platforms, platform);
        self.refilter();
    }

    /// Toggle a single content type in the filter.
    pub fn toggle_content_type(&mut self, content_type: &str) {
        toggle(&mut self.filters.content_types, content_type);
        self.refilter();
    }

    pub fn select_all_platforms(&mut self, selected: bool) {
        self.filters.platforms = if selected {
            self.domain.platforms.iter().cloned().collect()
        } else {
            Default::default()
        };
        self.refilter();
    }

    pub fn select_all_content_types(&mut self, selected: bool) {
        self.filters.content_types = if selected {
            self.domain.content_types.iter().cloned().collect()
        } else {
            Default::default()
        };
        self.refilter();
    }

    /// Apply a new sales range, clamped to the observed range.
    pub fn set_sales_range(&mut self, min: f64, max: f64) {
        let lo = self.domain.sales_min;
        let hi = self.domain.sales_max;
        let (cmin, cmax) = (min.clamp(lo, hi), max.clamp(lo, hi));
        if (cmin, cmax) != (min, max) {
            log::warn!("Sales range [{min}, {max}] clamped to [{cmin}, {cmax}]");
        }
        self.filters.set_sales_range(cmin, cmax);
        self.refilter();
    }

    /// Write the filtered table to `path`.
    pub fn export_filtered(&mut self, path: &Path) {
        match export_csv(&self.filtered, path) {
            Ok(()) => {
                self.status_message = Some(format!(
                    "Exported {} rows to {}",
                    self.filtered.len(),
                    path.display()
                ));
            }
            Err(e) => self.report_error("Export failed", &e),
        }
    }

    fn report_error(&mut self, what: &str, err: &dyn std::error::Error) {
        log::error!("{what}: {err}");
        self.status_message = Some(format!("Error: {what}: {err}"));
    }
}

fn toggle(set: &mut std::collections::BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const CSV: &str = "platform,content_type,influencer_name,followers,engagement_rate,clicks,impressions,ad_spend,monthly_sales\n\
        Instagram,Reel,ana,100,0.1,10,100,5,100\n\
        TikTok,Reel,ben,200,0.2,20,200,6,200\n\
        Instagram,Story,cy,300,0.3,30,300,7,50\n";

    fn state() -> (tempfile::NamedTempFile, AppState) {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(CSV.as_bytes()).expect("write");
        let state = AppState::open(file.path(), SummarySettings::default()).expect("open");
        (file, state)
    }

    #[test]
    fn starts_with_everything_selected() {
        let (_file, state) = state();
        assert_eq!(state.filtered.len(), 3);
        assert_eq!(state.summary.total_sales, 350.0);
        assert_eq!((state.filters.sales_min(), state.filters.sales_max()), (50.0, 200.0));
    }

    #[test]
    fn filter_changes_recompute_summary() {
        let (_file, mut state) = state();

        state.toggle_platform("TikTok");
        assert_eq!(state.summary.total_sales, 150.0);

        state.set_sales_range(60.0, 1_000.0);
        assert_eq!(state.filters.sales_max(), 200.0);
        assert_eq!(state.summary.total_sales, 100.0);

        state.select_all_content_types(false);
        assert!(state.filtered.is_empty());
        assert_eq!(state.summary.total_sales, 0.0);
    }

    #[test]
    fn missing_startup_file_is_an_error() {
        let err = AppState::open(Path::new("nope/missing.csv"), SummarySettings::default())
            .err()
            .expect("should fail");
        assert!(format!("{err:#}").contains("not found"));
    }

    #[test]
    fn failed_reload_keeps_current_table() {
        let (file, mut state) = state();
        std::fs::write(file.path(), "garbage\n1\n").expect("overwrite");

        state.reload();
        assert_eq!(state.table.len(), 3);
        assert!(state.status_message.as_deref().unwrap_or("").starts_with("Error"));
    }

    #[test]
    fn export_writes_filtered_rows() {
        let (_file, mut state) = state();
        state.toggle_platform("Instagram");

        let dir = tempfile::tempdir().expect("temp dir");
        let out = dir.path().join(crate::data::export::EXPORT_FILE_NAME);
        state.export_filtered(&out);

        let exported = crate::data::loader::load_csv(&out).expect("load export");
        assert_eq!(exported, state.filtered);
        assert_eq!(exported.len(), 1);
    }
}
