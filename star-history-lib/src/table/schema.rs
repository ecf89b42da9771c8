use crate::Result;
use crate::stars::RepoSpec;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;

/// Name of the first column of every star history table.
pub const MONTH_COLUMN: &str = "Month";

/// Suffix appended to a repository name to form its all-time column.
pub const ALL_TIME_SUFFIX: &str = " All-Time";

const SIDECAR_EXTENSION: &str = ".schema.json";

/// What a data column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ColumnKind {
    /// Stars gained during the month
    Monthly,

    /// All-time stars at the end of the month
    AllTime,
}

/// One data column of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub repository: RepoSpec,
    pub kind: ColumnKind,
}

/// Describes the columns of a star history CSV file.
///
/// Saved next to the CSV so readers know which columns are monthly and which are
/// all-time without guessing from column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSchema {
    pub month_column: String,
    pub columns: Vec<ColumnSpec>,
}

impl TableSchema {
    /// The standard layout: all monthly columns, then all all-time columns, in repository order.
    #[must_use]
    pub fn for_repositories(repositories: &[RepoSpec]) -> Self {
        let monthly = repositories.iter().map(|repo| ColumnSpec {
            name: repo.to_string(),
            repository: repo.clone(),
            kind: ColumnKind::Monthly,
        });

        let all_time = repositories.iter().map(|repo| ColumnSpec {
            name: format!("{repo}{ALL_TIME_SUFFIX}"),
            repository: repo.clone(),
            kind: ColumnKind::AllTime,
        });

        Self {
            month_column: MONTH_COLUMN.to_string(),
            columns: monthly.chain(all_time).collect(),
        }
    }

    /// Work out a schema from a header row alone, for files written without a schema.
    ///
    /// Columns ending in ` All-Time` are all-time columns; the rest are monthly.
    pub fn infer_from_header<'a>(header: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut names = header.into_iter();

        let Some(month_column) = names.next() else {
            bail!("table has no header row");
        };

        let mut columns = Vec::new();
        for name in names {
            let (repo_name, kind) = name
                .strip_suffix(ALL_TIME_SUFFIX)
                .map_or((name, ColumnKind::Monthly), |repo| (repo, ColumnKind::AllTime));

            let repository = repo_name
                .parse::<RepoSpec>()
                .map_err(|e: String| ohno::app_err!("column '{name}' does not name a repository: {e}"))?;

            columns.push(ColumnSpec {
                name: name.to_string(),
                repository,
                kind,
            });
        }

        let schema = Self {
            month_column: month_column.to_string(),
            columns,
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Header row in column order.
    #[must_use]
    pub fn header(&self) -> Vec<&str> {
        core::iter::once(self.month_column.as_str())
            .chain(self.columns.iter().map(|c| c.name.as_str()))
            .collect()
    }

    /// Repositories in the order of their monthly columns.
    #[must_use]
    pub fn repositories(&self) -> Vec<RepoSpec> {
        self.columns_of(ColumnKind::Monthly).map(|c| c.repository.clone()).collect()
    }

    pub fn columns_of(&self, kind: ColumnKind) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(move |c| c.kind == kind)
    }

    /// The column of the given kind for `repo`.
    #[must_use]
    pub fn column_for(&self, repo: &RepoSpec, kind: ColumnKind) -> Option<&ColumnSpec> {
        self.columns_of(kind).find(|c| &c.repository == repo)
    }

    /// Check that names are unique and every repository has exactly one column of each kind.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for name in self.header() {
            if !names.insert(name) {
                bail!("duplicate column '{name}'");
            }
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert((&column.repository, column.kind)) {
                bail!("repository '{}' has more than one {} column", column.repository, column.kind);
            }
        }

        for column in &self.columns {
            let other = match column.kind {
                ColumnKind::Monthly => ColumnKind::AllTime,
                ColumnKind::AllTime => ColumnKind::Monthly,
            };
            if !seen.contains(&(&column.repository, other)) {
                bail!("repository '{}' has no {other} column", column.repository);
            }
        }

        Ok(())
    }

    /// Where the schema for the CSV file at `csv_path` is stored.
    #[must_use]
    pub fn sidecar_path(csv_path: &Utf8Path) -> Utf8PathBuf {
        Utf8PathBuf::from(format!("{csv_path}{SIDECAR_EXTENSION}"))
    }

    /// Load the schema stored next to `csv_path`, if there is one.
    pub fn load_for(csv_path: &Utf8Path) -> Result<Option<Self>> {
        let path = Self::sidecar_path(csv_path);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).into_app_err_with(|| format!("reading table schema '{path}'")),
        };

        let schema: Self = serde_json::from_str(&text).into_app_err_with(|| format!("parsing table schema '{path}'"))?;
        schema.validate().map_err(|e| ohno::app_err!("invalid table schema '{path}': {e}"))?;
        Ok(Some(schema))
    }

    /// Delete the schema stored next to `csv_path`, if any.
    pub fn remove_for(csv_path: &Utf8Path) -> Result<()> {
        let path = Self::sidecar_path(csv_path);
        match fs::remove_file(&path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e).into_app_err_with(|| format!("removing table schema '{path}'")),
            _ => Ok(()),
        }
    }

    /// Save the schema next to `csv_path`.
    pub fn save_for(&self, csv_path: &Utf8Path) -> Result<()> {
        let path = Self::sidecar_path(csv_path);
        let text = serde_json::to_string_pretty(self)?;
        fs::write(&path, text).into_app_err_with(|| format!("writing table schema '{path}'"))?;
        Ok(())
    }
}
