use crate::Result;
use crate::stars::{MAX_PAGE_SIZE, RepoSpec};
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "stars.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Repositories to track, in CSV column order
    #[serde(default = "default_repositories")]
    pub repositories: Vec<RepoSpec>,

    /// Stars requested per page (1..=100)
    #[serde(default = "default_page_size")]
    pub page_size: u8,

    /// Prefix of exported CSV file names
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

fn default_repositories() -> Vec<RepoSpec> {
    ["coder", "code-server", "blink", "boundary", "agentapi", "aibridge"]
        .into_iter()
        .map(|name| RepoSpec::new("coder", name))
        .collect()
}

const fn default_page_size() -> u8 {
    MAX_PAGE_SIZE
}

fn default_file_prefix() -> String {
    "github_stars".to_string()
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// An explicit `config_path` must exist. Otherwise `stars.toml` in `base_dir` is used if present.
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8Path>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading star-history configuration file '{path}'"))?;
            (path.to_path_buf(), text)
        } else {
            let path = base_dir.join(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    // No config file found, use defaults
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading star-history configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate().map_err(|e| app_err!("invalid configuration file '{final_path}': {e}"))?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Path of the CSV file `collect` writes when no output is given.
    #[must_use]
    pub fn default_output(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(format!("{}.csv", self.file_prefix))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        validate_repositories(&self.repositories)?;

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(app_err!("page_size must be between 1 and {MAX_PAGE_SIZE}, got {}", self.page_size));
        }

        if self.file_prefix.is_empty() || self.file_prefix.contains(['/', '\\']) {
            return Err(app_err!(
                "file_prefix must be a non-empty file name without path separators, got '{}'",
                self.file_prefix
            ));
        }

        Ok(())
    }
}

/// Check that a repository list is usable: non-empty and free of duplicates.
pub fn validate_repositories(repositories: &[RepoSpec]) -> Result<()> {
    if repositories.is_empty() {
        return Err(app_err!("at least one repository must be tracked"));
    }

    let mut seen = HashSet::new();
    for repo in repositories {
        if !seen.insert(repo) {
            return Err(app_err!("repository '{repo}' is listed more than once"));
        }
    }

    Ok(())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repositories: default_repositories(),
            page_size: default_page_size(),
            file_prefix: default_file_prefix(),
        }
    }
}
