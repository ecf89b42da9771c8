use super::schema::{ColumnKind, TableSchema};
use crate::Result;
use crate::history::{HistoryRow, StarHistory};
use crate::stars::MonthKey;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, app_err};
use std::fs::File;
use std::io::Read;

const LOG_TARGET: &str = "     table";

/// A star history table loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTable {
    pub path: Utf8PathBuf,
    pub schema: TableSchema,
    pub history: StarHistory,
}

/// Read a star history CSV.
///
/// Column roles come from `schema` when given, otherwise they are inferred from the header.
/// `source` names the input in error messages.
pub fn read_history<R: Read>(reader: R, schema: Option<&TableSchema>, source: &str) -> Result<(TableSchema, StarHistory)> {
    let mut csv = csv::ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(reader);

    let header = csv.headers().into_app_err_with(|| format!("reading header of '{source}'"))?.clone();

    let schema = match schema {
        Some(schema) => schema.clone(),
        None => TableSchema::infer_from_header(header.iter()).map_err(|e| app_err!("unrecognized header in '{source}': {e}"))?,
    };

    let column_index = |name: &str| {
        header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| app_err!("'{source}' is missing column '{name}'"))
    };

    let month_index = column_index(&schema.month_column)?;
    let repositories = schema.repositories();

    let monthly_indices = repositories
        .iter()
        .map(|repo| {
            let column = schema.column_for(repo, ColumnKind::Monthly).ok_or_else(|| app_err!("no monthly column for '{repo}'"))?;
            column_index(&column.name)
        })
        .collect::<Result<Vec<_>>>()?;

    let all_time_indices = repositories
        .iter()
        .map(|repo| {
            let column = schema.column_for(repo, ColumnKind::AllTime).ok_or_else(|| app_err!("no all-time column for '{repo}'"))?;
            column_index(&column.name)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record.into_app_err_with(|| format!("reading '{source}'"))?;
        let line = record.position().map_or(0, csv::Position::line);

        let cell = |index: usize| {
            record
                .get(index)
                .ok_or_else(|| app_err!("'{source}' line {line}: missing value for column '{}'", &header[index]))
        };

        let month_cell = cell(month_index)?;
        let month: MonthKey = month_cell
            .parse()
            .map_err(|e: String| app_err!("'{source}' line {line}, column '{}': {e}", schema.month_column))?;

        let parse_count = |index: usize, value: &str| -> Result<u64> {
            value
                .parse::<u64>()
                .map_err(|e| app_err!("'{source}' line {line}, column '{}': invalid count '{value}': {e}", &header[index]))
        };

        let monthly = monthly_indices
            .iter()
            .map(|&index| parse_count(index, cell(index)?))
            .collect::<Result<Vec<_>>>()?;

        let all_time = all_time_indices
            .iter()
            .map(|&index| match cell(index)? {
                "" => Ok(None),
                value => parse_count(index, value).map(Some),
            })
            .collect::<Result<Vec<_>>>()?;

        rows.push(HistoryRow { month, monthly, all_time });
    }

    let history = StarHistory::new(repositories, rows).map_err(|e| app_err!("'{source}': {e}"))?;
    Ok((schema, history))
}

/// Load the star history CSV at `path`, using its schema file when there is one.
pub fn load_history(path: &Utf8Path) -> Result<LoadedTable> {
    let schema = TableSchema::load_for(path)?;
    let file = File::open(path).into_app_err_with(|| format!("opening '{path}'"))?;

    let (schema, history) = read_history(file, schema.as_ref(), path.as_str())?;
    log::debug!(target: LOG_TARGET, "Loaded {} month(s) for {} repositories from '{path}'", history.rows().len(), history.repositories().len());

    Ok(LoadedTable {
        path: path.to_path_buf(),
        schema,
        history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stars::RepoSpec;
    use crate::table::{TableSchema, save_history, write_history};

    const SAMPLE: &str = "\
Month,coder/coder,coder/blink,coder/coder All-Time,coder/blink All-Time
2025-01,10,0,75,
2025-02,20,1,95,4
2025-03,5,0,100,4
";

    #[test]
    fn test_read_inferred_schema() {
        let (schema, history) = read_history(SAMPLE.as_bytes(), None, "sample").unwrap();

        assert_eq!(schema.repositories(), [RepoSpec::new("coder", "coder"), RepoSpec::new("coder", "blink")]);
        assert_eq!(history.rows().len(), 3);
        assert_eq!(history.rows()[0].monthly, [10, 0]);
        assert_eq!(history.rows()[0].all_time, [Some(75), None]);
        assert_eq!(history.rows()[2].all_time, [Some(100), Some(4)]);
    }

    #[test]
    fn test_read_with_explicit_schema_and_reordered_columns() {
        let csv = "\
Month,coder/coder All-Time,coder/coder
2025-01,7,7
2025-02,9,2
";
        let schema = TableSchema::for_repositories(&[RepoSpec::new("coder", "coder")]);
        let (_, history) = read_history(csv.as_bytes(), Some(&schema), "reordered").unwrap();

        assert_eq!(history.rows()[1].monthly, [2]);
        assert_eq!(history.rows()[1].all_time, [Some(9)]);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let csv = "Month,coder/coder\n2025-01,1\n";
        let schema = TableSchema::for_repositories(&[RepoSpec::new("coder", "coder")]);
        let err = read_history(csv.as_bytes(), Some(&schema), "short.csv").unwrap_err();

        let message = err.to_string();
        assert!(message.contains("short.csv"), "{message}");
        assert!(message.contains("coder/coder All-Time"), "{message}");
    }

    #[test]
    fn test_bad_count_reports_line_and_column() {
        let csv = "\
Month,coder/coder,coder/coder All-Time
2025-01,1,1
2025-02,lots,2
";
        let err = read_history(csv.as_bytes(), None, "bad.csv").unwrap_err();

        let message = err.to_string();
        assert!(message.contains("line 3"), "{message}");
        assert!(message.contains("'coder/coder'"), "{message}");
        assert!(message.contains("lots"), "{message}");
    }

    #[test]
    fn test_bad_month_is_reported() {
        let csv = "Month,coder/coder,coder/coder All-Time\nMarch,1,1\n";
        let err = read_history(csv.as_bytes(), None, "bad.csv").unwrap_err();
        assert!(err.to_string().contains("March"));
    }

    #[test]
    fn test_short_row_is_reported() {
        let csv = "Month,coder/coder,coder/coder All-Time\n2025-01,1\n";
        let _ = read_history(csv.as_bytes(), None, "short.csv").unwrap_err();
    }

    #[test]
    fn test_unordered_months_are_rejected() {
        let csv = "Month,coder/coder,coder/coder All-Time\n2025-02,1,2\n2025-01,1,1\n";
        let _ = read_history(csv.as_bytes(), None, "unordered.csv").unwrap_err();
    }

    #[test]
    fn test_roundtrip_through_writer() {
        let (schema, history) = read_history(SAMPLE.as_bytes(), None, "sample").unwrap();

        let mut out = Vec::new();
        write_history(&history, &schema, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), SAMPLE);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_save_and_load_roundtrip() {
        let (_, history) = read_history(SAMPLE.as_bytes(), None, "sample").unwrap();

        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("github_stars.csv")).unwrap();
        save_history(&history, &path).unwrap();

        assert!(TableSchema::sidecar_path(&path).exists());

        let loaded = load_history(&path).unwrap();
        assert_eq!(loaded.history, history);
        assert_eq!(loaded.path, path);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_header_only_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("github_stars.csv")).unwrap();
        std::fs::write(&path, "Month,coder/coder,coder/coder All-Time\n").unwrap();

        let loaded = load_history(&path).unwrap();
        assert!(loaded.history.is_empty());
        assert_eq!(loaded.history.repositories(), [RepoSpec::new("coder", "coder")]);
    }
}
