//! Naming convention for query groups: `"{n}_queries"` for `n` in `1..=MAX_GROUPS`.

/// Highest group number looked up in a dataset.
pub const MAX_GROUPS: u32 = 20;

pub const GROUP_KEY_SUFFIX: &str = "_queries";

/// Key of the reference embedding in an embeddings file.
pub const REFERENCE_EMBEDDING_KEY: &str = "original_query_embedding";

/// Key of the reference query text.
pub const ORIGINAL_QUERY_KEY: &str = "original_query";

#[must_use]
pub fn group_key(n: u32) -> String {
  format!("{n}{GROUP_KEY_SUFFIX}")
}

/// Inverse of [`group_key`]. Returns `None` for keys outside the convention.
#[must_use]
pub fn parse_group_key(key: &str) -> Option<u32> {
  let n: u32 = key.strip_suffix(GROUP_KEY_SUFFIX)?.parse().ok()?;
  (1..=MAX_GROUPS).contains(&n).then_some(n)
}
