/// Maximum roast length (bytes).
pub const MAX_ROAST_LENGTH: usize = 400;

/// Maximum suggestion length (bytes).
pub const MAX_SUGGESTION_LENGTH: usize = 500;

/// Validate a roast line. Must be non-blank and under the length limit.
pub fn validate_roast(roast: &str) -> Result<(), String> {
    if roast.trim().is_empty() {
        return Err("Roast cannot be empty".into());
    }
    if roast.len() > MAX_ROAST_LENGTH {
        return Err(format!("Roast too long (max {} characters)", MAX_ROAST_LENGTH));
    }
    Ok(())
}

/// Validate a suggestion entry. Must be non-blank and under the length limit.
pub fn validate_suggestion(entry: &str) -> Result<(), String> {
    if entry.trim().is_empty() {
        return Err("Suggestion cannot be empty".into());
    }
    if entry.len() > MAX_SUGGESTION_LENGTH {
        return Err(format!(
            "Suggestion too long (max {} characters)",
            MAX_SUGGESTION_LENGTH
        ));
    }
    Ok(())
}
