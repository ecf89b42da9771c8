use crate::Result;
use ohno::bail;
use tokio::process::Command;

const LOG_TARGET: &str = "     stars";

/// Resolve the token used to talk to the GitHub API.
///
/// An explicit token wins. Otherwise the ambient GitHub CLI login is used (`gh auth token`).
pub async fn resolve_token(explicit: Option<&str>) -> Result<String> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    log::debug!(target: LOG_TARGET, "No token given, asking the GitHub CLI for one");

    let output = match Command::new("gh").args(["auth", "token"]).output().await {
        Ok(output) => output,
        Err(e) => bail!("no GitHub token available: pass --github-token, set GITHUB_TOKEN, or install and log in to the GitHub CLI ({e})"),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("no GitHub token available: `gh auth token` failed: {}", stderr.trim());
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        bail!("no GitHub token available: `gh auth token` returned nothing");
    }

    Ok(token)
}
