use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use super::model::{CampaignRecord, CampaignTable};

/// Header names every campaign CSV must carry.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "platform",
    "content_type",
    "influencer_name",
    "followers",
    "engagement_rate",
    "clicks",
    "impressions",
    "ad_spend",
    "monthly_sales",
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong while reading a campaign CSV.
/// All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("CSV is missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("row {row}, column '{column}': '{value}' {reason}")]
    Parse {
        row: usize,
        column: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("reading data file: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a campaign table from a comma-separated file with a header row.
///
/// Columns are matched by (trimmed) header name, so their order in the file
/// does not matter and unknown extra columns are ignored.
pub fn load_csv(path: &Path) -> Result<CampaignTable, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    read_csv(file)
}

/// Parse campaign records from any reader. `load_csv` is a thin wrapper.
pub fn read_csv<R: std::io::Read>(source: R) -> Result<CampaignTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let index = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = result?;
        records.push(index.parse_row(&row, i + 1)?);
    }

    Ok(CampaignTable::from_records(records))
}

// ---------------------------------------------------------------------------
// Header resolution and row coercion
// ---------------------------------------------------------------------------

/// Position of each required column within a CSV row.
struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self, LoadError> {
        let mut positions = HashMap::new();
        let mut missing = Vec::new();

        for column in REQUIRED_COLUMNS {
            match headers.iter().position(|h| h == column) {
                Some(idx) => {
                    positions.insert(column, idx);
                }
                None => missing.push(column.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(LoadError::Schema { missing });
        }
        Ok(ColumnIndex { positions })
    }

    fn cell<'r>(&self, row: &'r csv::StringRecord, column: &'static str) -> &'r str {
        self.positions
            .get(column)
            .and_then(|&idx| row.get(idx))
            .unwrap_or("")
    }

    fn parse_row(&self, row: &csv::StringRecord, row_no: usize) -> Result<CampaignRecord, LoadError> {
        Ok(CampaignRecord {
            platform: self.text(row, row_no, "platform")?,
            content_type: self.text(row, row_no, "content_type")?,
            // Names may legitimately be blank; they are only ever grouped on.
            influencer_name: self.cell(row, "influencer_name").to_string(),
            followers: self.count(row, row_no, "followers")?,
            engagement_rate: self.float(row, row_no, "engagement_rate")?,
            clicks: self.count(row, row_no, "clicks")?,
            impressions: self.count(row, row_no, "impressions")?,
            ad_spend: self.float(row, row_no, "ad_spend")?,
            monthly_sales: self.float(row, row_no, "monthly_sales")?,
        })
    }

    fn text(&self, row: &csv::StringRecord, row_no: usize, column: &'static str) -> Result<String, LoadError> {
        let raw = self.cell(row, column);
        if raw.is_empty() {
            return Err(parse_error(row_no, column, raw, "is empty"));
        }
        Ok(raw.to_string())
    }

    fn float(&self, row: &csv::StringRecord, row_no: usize, column: &'static str) -> Result<f64, LoadError> {
        let raw = self.cell(row, column);
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(parse_error(row_no, column, raw, "is not a number")),
        }
    }

    /// Non-negative integer. Accepts `1200.0`, which pandas writes for
    /// integer columns that once held a missing value.
    fn count(&self, row: &csv::StringRecord, row_no: usize, column: &'static str) -> Result<u64, LoadError> {
        let raw = self.cell(row, column);
        if let Ok(v) = raw.parse::<u64>() {
            return Ok(v);
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => Ok(v as u64),
            Ok(_) => Err(parse_error(row_no, column, raw, "is not a non-negative integer")),
            Err(_) => Err(parse_error(row_no, column, raw, "is not a number")),
        }
    }
}

fn parse_error(row: usize, column: &'static str, value: &str, reason: &'static str) -> LoadError {
    LoadError::Parse {
        row,
        column,
        value: value.to_string(),
        reason,
    }
}

// ---------------------------------------------------------------------------
// TableCache – explicit once-per-path loading
// ---------------------------------------------------------------------------

/// Keeps every table loaded during the process lifetime, keyed by path.
///
/// `load` hands out the cached instance; only `reload` touches the disk again.
#[derive(Debug, Default)]
pub struct TableCache {
    entries: HashMap<PathBuf, Arc<CampaignTable>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the table for `path`, reading the file only on first use.
    pub fn load(&mut self, path: &Path) -> Result<Arc<CampaignTable>, LoadError> {
        if let Some(table) = self.entries.get(path) {
            log::debug!("Using cached table for {}", path.display());
            return Ok(Arc::clone(table));
        }
        self.reload(path)
    }

    /// Re-read `path` and replace any cached entry. On failure the previous
    /// entry (if any) is kept.
    pub fn reload(&mut self, path: &Path) -> Result<Arc<CampaignTable>, LoadError> {
        let table = Arc::new(load_csv(path)?);
        let domain = table.domain();
        log::info!(
            "Loaded {} campaigns ({} platforms, {} content types) from {}",
            table.len(),
            domain.platforms.len(),
            domain.content_types.len(),
            path.display()
        );
        self.entries.insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str =
        "platform,content_type,influencer_name,followers,engagement_rate,clicks,impressions,ad_spend,monthly_sales";

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn loads_typed_records() {
        let csv = format!(
            "{HEADER}\nInstagram,Reel,alice,12000,0.045,340,9000,150.5,1200.75\nTikTok,Story,bob,800.0,3.2,12,400,20,99\n"
        );
        let table = read_csv(csv.as_bytes()).expect("valid CSV");

        assert_eq!(table.len(), 2);
        let first = &table.records[0];
        assert_eq!(first.platform, "Instagram");
        assert_eq!(first.followers, 12_000);
        assert_eq!(first.engagement_rate, 0.045);
        assert_eq!(first.monthly_sales, 1200.75);
        assert_eq!(table.records[1].followers, 800);
    }

    #[test]
    fn column_order_and_extra_columns_do_not_matter() {
        let csv = "campaign_id,monthly_sales,platform,content_type,influencer_name,followers,engagement_rate,clicks,impressions,ad_spend\n\
                   7,500,YouTube,Video,carol,10,0.1,1,2,3\n";
        let table = read_csv(csv.as_bytes()).expect("valid CSV");
        assert_eq!(table.records[0].platform, "YouTube");
        assert_eq!(table.records[0].monthly_sales, 500.0);
    }

    #[test]
    fn bundled_sample_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("influencer_campaigns.csv");
        let table = load_csv(&path).expect("bundled sample is valid");
        assert_eq!(table.len(), 60);
        assert!(table.iter().all(|r| !r.platform.is_empty() && r.monthly_sales >= 0.0));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_csv(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn missing_columns_are_listed() {
        let csv = "platform,content_type,influencer_name,followers,engagement_rate,impressions,ad_spend\n";
        match read_csv(csv.as_bytes()) {
            Err(LoadError::Schema { missing }) => {
                assert_eq!(missing, vec!["clicks", "monthly_sales"]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_value_reports_row_and_column() {
        let csv = format!(
            "{HEADER}\nInstagram,Reel,a,1,0.1,1,1,1,1\nInstagram,Reel,b,1,0.1,abc,1,1,1\n"
        );
        match read_csv(csv.as_bytes()) {
            Err(LoadError::Parse { row, column, value, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "clicks");
                assert_eq!(value, "abc");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn negative_count_and_empty_category_are_rejected() {
        let negative = format!("{HEADER}\nInstagram,Reel,a,-5,0.1,1,1,1,1\n");
        assert!(matches!(
            read_csv(negative.as_bytes()),
            Err(LoadError::Parse { column: "followers", .. })
        ));

        let blank = format!("{HEADER}\n,Reel,a,5,0.1,1,1,1,1\n");
        assert!(matches!(
            read_csv(blank.as_bytes()),
            Err(LoadError::Parse { column: "platform", .. })
        ));

        let no_sales = format!("{HEADER}\nInstagram,Reel,a,5,0.1,1,1,1,\n");
        assert!(matches!(
            read_csv(no_sales.as_bytes()),
            Err(LoadError::Parse { column: "monthly_sales", .. })
        ));
    }

    #[test]
    fn ragged_row_is_a_csv_error() {
        let csv = format!("{HEADER}\nInstagram,Reel,a,1,0.1,1,1,1,1\nTikTok,Story,b,2\n");
        assert!(matches!(read_csv(csv.as_bytes()), Err(LoadError::Csv(_))));
    }

    #[test]
    fn cache_returns_same_instance_until_reload() {
        let file = write_temp(&format!("{HEADER}\nInstagram,Reel,a,1,0.1,1,1,1,10\n"));
        let mut cache = TableCache::new();

        let first = cache.load(file.path()).expect("first load");
        let second = cache.load(file.path()).expect("cached load");
        assert!(Arc::ptr_eq(&first, &second));

        let reloaded = cache.reload(file.path()).expect("reload");
        assert!(!Arc::ptr_eq(&first, &reloaded));
        assert_eq!(*first, *reloaded);

        let after = cache.load(file.path()).expect("cached after reload");
        assert!(Arc::ptr_eq(&reloaded, &after));
    }

    #[test]
    fn failed_reload_keeps_previous_entry() {
        let file = write_temp(&format!("{HEADER}\nInstagram,Reel,a,1,0.1,1,1,1,10\n"));
        let mut cache = TableCache::new();
        let first = cache.load(file.path()).expect("first load");

        std::fs::write(file.path(), "platform\nInstagram\n").expect("overwrite");
        assert!(matches!(cache.reload(file.path()), Err(LoadError::Schema { .. })));

        let still = cache.load(file.path()).expect("cached entry survives");
        assert!(Arc::ptr_eq(&first, &still));
    }
}
