use std::io::Write;
use std::path::Path;

use thiserror::Error;

use super::model::CampaignTable;

/// File name offered when exporting the filtered table.
pub const EXPORT_FILE_NAME: &str = "filtered_influencer_data.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("writing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("writing export file: {0}")]
    Io(#[from] std::io::Error),
}

/// Write `table` as CSV with the same nine columns the loader expects.
///
/// The header is written even when the table is empty.
pub fn write_csv<W: Write>(table: &CampaignTable, writer: W) -> Result<(), ExportError> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    out.write_record(super::loader::REQUIRED_COLUMNS)?;
    for rec in table {
        out.serialize(rec)?;
    }
    out.flush()?;
    Ok(())
}

/// Create (or truncate) `path` and write `table` into it.
pub fn export_csv(table: &CampaignTable, path: &Path) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_csv(table, std::io::BufWriter::new(file))?;
    log::info!("Exported {} campaigns to {}", table.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{load_csv, read_csv};
    use crate::data::model::tests::sample_table;

    #[test]
    fn header_matches_input_schema() {
        let mut buf = Vec::new();
        write_csv(&CampaignTable::default(), &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(
            text.trim_end(),
            "platform,content_type,influencer_name,followers,engagement_rate,clicks,impressions,ad_spend,monthly_sales"
        );
    }

    #[test]
    fn exported_file_loads_back_unchanged() {
        let table = sample_table();
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(EXPORT_FILE_NAME);

        export_csv(&table, &path).expect("export");
        assert_eq!(load_csv(&path).expect("reload"), table);
    }

    #[test]
    fn names_with_commas_are_quoted() {
        let mut table = sample_table();
        table.records[0].influencer_name = "Doe, Jane".to_string();

        let mut buf = Vec::new();
        write_csv(&table, &mut buf).expect("write");
        assert_eq!(read_csv(buf.as_slice()).expect("parse"), table);
    }
}
