use super::error::StorageError;

/// Validate a container name: a single lowercase segment of `[a-z0-9-]`,
/// 3-63 characters, not starting or ending with `-`.
pub fn validate_container(container: &str) -> Result<(), StorageError> {
    let len = container.len();
    if !(3..=63).contains(&len) {
        return Err(StorageError::InvalidName(format!(
            "container name must be 3-63 characters, got {len}"
        )));
    }
    if !container
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(StorageError::InvalidName(format!(
            "container name '{container}' may only contain a-z, 0-9 and '-'"
        )));
    }
    if container.starts_with('-') || container.ends_with('-') {
        return Err(StorageError::InvalidName(format!(
            "container name '{container}' must not start or end with '-'"
        )));
    }
    Ok(())
}

/// Validate an object name within a container.
///
/// Names are `/`-separated relative paths. Segments must be non-empty and may
/// not start with `.`, which rules out traversal and hidden files.
pub fn validate_object_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty() {
        return Err(StorageError::InvalidName("object name cannot be empty".into()));
    }
    if name.len() > 1024 {
        return Err(StorageError::InvalidName(
            "object name exceeds maximum length of 1024 characters".into(),
        ));
    }
    if name.chars().any(|c| c.is_ascii_control()) {
        return Err(StorageError::InvalidName(
            "object name must not contain control characters".into(),
        ));
    }
    if name.contains('\\') {
        return Err(StorageError::InvalidName(
            "object name must not contain backslashes".into(),
        ));
    }
    for segment in name.split('/') {
        if segment.is_empty() {
            return Err(StorageError::InvalidName(format!(
                "object name '{name}' contains an empty segment"
            )));
        }
        if segment.starts_with('.') {
            return Err(StorageError::InvalidName(format!(
                "object name '{name}' has a segment starting with '.'"
            )));
        }
    }
    Ok(())
}
