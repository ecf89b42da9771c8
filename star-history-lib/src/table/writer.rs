use super::schema::{ColumnKind, TableSchema};
use crate::Result;
use crate::history::StarHistory;
use camino::Utf8Path;
use ohno::{IntoAppError, app_err};
use std::fs::File;
use std::io::Write;

/// Write `history` as CSV: a `Month` column, then each repository's monthly count, then each
/// repository's all-time total. Unknown all-time totals are left blank.
pub fn write_history<W: Write>(history: &StarHistory, schema: &TableSchema, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(schema.header())?;

    let repositories = history.repositories();
    let column_indices = schema
        .columns
        .iter()
        .map(|column| {
            repositories
                .iter()
                .position(|repo| repo == &column.repository)
                .map(|index| (index, column.kind))
                .ok_or_else(|| app_err!("column '{}' names a repository that is not in the history", column.name))
        })
        .collect::<Result<Vec<_>>>()?;

    for row in history.rows() {
        let mut record = Vec::with_capacity(column_indices.len() + 1);
        record.push(row.month.to_string());
        for &(index, kind) in &column_indices {
            record.push(match kind {
                ColumnKind::Monthly => row.monthly[index].to_string(),
                ColumnKind::AllTime => row.all_time[index].map(|total| total.to_string()).unwrap_or_default(),
            });
        }
        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(())
}

/// Write `history` to `path` in the standard layout, with its schema alongside.
///
/// Existing files are overwritten. Any previous schema is removed before the CSV is
/// rewritten, so a failed run never leaves a new table next to a stale schema.
pub fn save_history(history: &StarHistory, path: &Utf8Path) -> Result<()> {
    let schema = TableSchema::for_repositories(history.repositories());
    TableSchema::remove_for(path)?;

    let file = File::create(path).into_app_err_with(|| format!("creating '{path}'"))?;
    write_history(history, &schema, file).map_err(|e| app_err!("writing star history to '{path}': {e}"))?;
    schema.save_for(path)?;

    Ok(())
}
