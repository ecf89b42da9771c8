use core::fmt::{Display, Formatter};
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

/// Identifies a tracked repository by owner and name.
///
/// Parses from either `owner/name` or a repository URL such as
/// `https://github.com/owner/name.git`. Displays (and serializes) as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoSpec {
    owner: Arc<str>,
    name: Arc<str>,
}

impl RepoSpec {
    #[must_use]
    pub fn new(owner: impl AsRef<str>, name: impl AsRef<str>) -> Self {
        Self {
            owner: Arc::from(owner.as_ref()),
            name: Arc::from(name.as_ref()),
        }
    }

    /// Parse a repository URL, keeping only the owner and repository segments.
    pub fn from_url(url: &Url) -> Result<Self, String> {
        let path_segments: Vec<_> = url.path_segments().map(Iterator::collect).unwrap_or_default();

        match path_segments.as_slice() {
            [owner, name, ..] => Self::from_parts(owner, name.trim_end_matches(".git"))
                .ok_or_else(|| format!("invalid repository URL: empty owner or repo name: {url}")),
            _ => Err(format!("invalid repository URL format: {url}")),
        }
    }

    fn from_parts(owner: &str, name: &str) -> Option<Self> {
        let valid = |s: &str| !s.is_empty() && !s.contains(char::is_whitespace);
        (valid(owner) && valid(name)).then(|| Self::new(owner, name))
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for RepoSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.contains("://") {
            let url = Url::parse(s).map_err(|e| format!("invalid repository URL '{s}': {e}"))?;
            return Self::from_url(&url);
        }

        let Some((owner, name)) = s.split_once('/') else {
            return Err(format!("invalid repository '{s}': expected 'owner/name'"));
        };

        if name.contains('/') {
            return Err(format!("invalid repository '{s}': expected 'owner/name'"));
        }

        Self::from_parts(owner, name).ok_or_else(|| format!("invalid repository '{s}': empty owner or repo name"))
    }
}

impl TryFrom<String> for RepoSpec {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        value.parse()
    }
}

impl From<RepoSpec> for String {
    fn from(value: RepoSpec) -> Self {
        value.to_string()
    }
}

impl Display for RepoSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
