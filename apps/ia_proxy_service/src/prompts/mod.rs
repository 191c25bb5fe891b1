pub mod content_prompt;
pub mod property_prompt;

pub const NOT_SPECIFIED: &str = "no especificado";

/// Phrase for `key` in a fixed table. The first entry is the default and is
/// used for missing or unknown keys.
pub(crate) fn lookup_phrase(table: &[(&str, &'static str)], key: Option<&str>) -> &'static str {
    let key = key.map(|key| key.trim().to_lowercase()).unwrap_or_default();
    table
        .iter()
        .find(|(name, _)| *name == key)
        .or_else(|| table.first())
        .map(|(_, phrase)| *phrase)
        .unwrap_or_default()
}

pub(crate) fn or_not_specified(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_SPECIFIED)
}
