use crate::errors::ModelError;

/// Trim `value` and check its length in characters.
pub(crate) fn text(field: &str, value: &str, min: usize, max: usize) -> Result<String, ModelError> {
    let v = value.trim();
    let n = v.chars().count();
    if n < min {
        return Err(if min <= 1 {
            ModelError::validation(format!("{field} required"))
        } else {
            ModelError::validation(format!("{field} must have at least {min} characters"))
        });
    }
    if n > max {
        return Err(ModelError::validation(format!("{field} must have at most {max} characters")));
    }
    Ok(v.to_string())
}

/// Like [`text`] but blank input collapses to `None`.
pub(crate) fn optional_text(field: &str, value: Option<&str>, max: usize) -> Result<Option<String>, ModelError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => text(field, v, 1, max).map(Some),
    }
}
