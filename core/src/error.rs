use thiserror::Error;

/// Problems with user input. Shown to the user; nothing is written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a task description.")]
    BlankDescription,
    #[error("Unknown key: '{0}'")]
    UnknownKey(String),
    #[error("Ambiguous key: '{key}' matches {candidates:?}")]
    AmbiguousKey { key: String, candidates: Vec<String> },
    #[error("Could not parse date: '{0}'")]
    InvalidDate(String),
    #[error("Invalid priority '{0}' (expected high, medium or low)")]
    InvalidPriority(String),
}

/// Resolving a task id typed by the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("No task matches id '{0}'")]
    NotFound(String),
    #[error("Id '{prefix}' is ambiguous ({count} tasks match)")]
    Ambiguous { prefix: String, count: usize },
}

/// Trims `description` and rejects it when nothing is left.
pub fn validate_description(description: &str) -> Result<&str, ValidationError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        Err(ValidationError::BlankDescription)
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_description() {
        assert_eq!(validate_description("  Buy milk "), Ok("Buy milk"));
        assert_eq!(validate_description(""), Err(ValidationError::BlankDescription));
        assert_eq!(validate_description(" \t\n"), Err(ValidationError::BlankDescription));
    }
}
