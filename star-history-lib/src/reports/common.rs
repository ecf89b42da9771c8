//! Formatting helpers shared across report generators.

use crate::stars::RepoSpec;

/// Format a count with `,` thousands separators.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Format a signed change as `+1,234` or `-56`; zero is `0`.
pub fn format_delta(delta: i64) -> String {
    match delta {
        0 => "0".to_string(),
        d if d > 0 => format!("+{}", format_count(d.unsigned_abs())),
        d => format!("-{}", format_count(d.unsigned_abs())),
    }
}

/// Repository name without its owner, truncated to `max_chars` characters.
pub fn short_name(repo: &RepoSpec, max_chars: usize) -> String {
    repo.name().chars().take(max_chars).collect()
}
