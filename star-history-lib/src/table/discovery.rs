use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::IntoAppError;

/// Find the most recent star history file in `dir`.
///
/// Candidates are the `.csv` files whose name starts with `prefix`. The lexicographically
/// greatest name wins, which for dated file names is also the newest.
///
/// Matching is a plain name prefix, so any `<prefix>*.csv` takes part: `github_stars_backup.csv`
/// sorts after every `github_stars_<YYYYMMDD>.csv` and is picked over them.
pub fn find_latest(dir: &Utf8Path, prefix: &str) -> Result<Option<Utf8PathBuf>> {
    let entries = dir.read_dir_utf8().into_app_err_with(|| format!("listing directory '{dir}'"))?;

    let mut latest: Option<Utf8PathBuf> = None;
    for entry in entries {
        let entry = entry.into_app_err_with(|| format!("listing directory '{dir}'"))?;
        let name = entry.file_name();

        if !name.starts_with(prefix) || !name.ends_with(".csv") {
            continue;
        }

        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            continue;
        }

        if latest.as_ref().is_none_or(|current| current.file_name() < Some(name)) {
            latest = Some(entry.into_path());
        }
    }

    Ok(latest)
}
