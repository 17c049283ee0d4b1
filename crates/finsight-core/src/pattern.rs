use crate::error::Result;
use regex::Regex;

/// Compile a shared-store glob pattern into an anchored regex.
///
/// Dialect: `*` matches any run of characters, `?` matches exactly one
/// character, everything else is literal. Both cache tiers run pattern
/// deletes through this so they agree on pattern semantics.
pub fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let mut source = String::with_capacity(pattern.len() + 2);
    source.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            other => source.push_str(&regex::escape(&other.to_string())),
        }
    }
    source.push('$');

    Ok(Regex::new(&source)?)
}
