use crate::artifact::ArtifactType;
use crate::error::{CoreError, Result};
use std::collections::HashMap;

/// Derive the cache key for an artifact.
///
/// The key is `policy.key_prefix + identifier`, followed by `":"` and the
/// context serialized as `k=v` pairs joined with `"&"` when the context map is
/// non-empty. Context pairs are sorted lexicographically by key first, so two
/// maps with equal content produce equal keys regardless of insertion order.
///
/// Pure function of its inputs. An empty identifier is a caller contract
/// violation and is rejected instead of silently colliding on the bare prefix.
pub fn generate_key(
    artifact: &ArtifactType,
    identifier: &str,
    context: &HashMap<String, String>,
) -> Result<String> {
    if identifier.is_empty() {
        return Err(CoreError::invalid_identifier(format!(
            "empty identifier for artifact type '{artifact}'"
        )));
    }

    let mut key = format!("{}{}", artifact.policy().key_prefix, identifier);

    if !context.is_empty() {
        let mut pairs: Vec<(&String, &String)> = context.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));

        let suffix = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        key.push(':');
        key.push_str(&suffix);
    }

    Ok(key)
}
