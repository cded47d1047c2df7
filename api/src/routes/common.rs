use validator::{ValidationError, ValidationErrors};

/// Joins every field message of `errors` into one line.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

/// Year levels run from 1 to 5.
pub fn validate_year_levels(years: &[i32]) -> Result<(), ValidationError> {
    if years.iter().all(|y| (1..=5).contains(y)) {
        Ok(())
    } else {
        Err(ValidationError::new("year_level").with_message("Year levels must be between 1 and 5".into()))
    }
}
