//! Flattening of field validation failures into displayable messages.
use std::collections::BTreeMap;
use validator::ValidationErrors;

/// Returns one `(field, message)` pair per failing field, sorted by field.
///
/// Only the first failure of each field is kept. Failures without a message
/// fall back to "`<field>` is invalid".
pub fn field_messages(errors: &ValidationErrors) -> Vec<(String, String)> {
    let by_field: BTreeMap<String, String> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, field_errors)| {
            field_errors.first().map(|error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                (field.to_string(), message)
            })
        })
        .collect();
    by_field.into_iter().collect()
}
