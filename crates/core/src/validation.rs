//! Request field validation shared by the API handlers, so every write
//! path applies the same rules the schema enforces.

use crate::error::CoreError;

/// Maximum length for a task title.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum length for a task description.
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// Maximum length for a category name.
pub const MAX_CATEGORY_NAME_LEN: usize = 50;

/// Maximum length for a user's display name.
pub const MAX_USER_NAME_LEN: usize = 100;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Color assigned to new categories when none is given.
pub const DEFAULT_CATEGORY_COLOR: &str = "#3b82f6";

/// Validate a task title: non-blank and within the length limit.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title is required".to_string()));
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a task description length.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a category name: non-blank and within the length limit.
pub fn validate_category_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Category name is required".to_string(),
        ));
    }
    if name.len() > MAX_CATEGORY_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Category name must be at most {MAX_CATEGORY_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a category color: a hex value like `#3b82f6`.
pub fn validate_color(color: &str) -> Result<(), CoreError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid color '{color}'. Expected a hex value like {DEFAULT_CATEGORY_COLOR}"
        )))
    }
}

/// Lightweight email shape check: a non-empty local part and a domain
/// containing a dot. Deliverability is the mail system's problem.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid email address '{email}'"
        )))
    }
}

/// Validate a user's display name.
pub fn validate_user_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Name is required".to_string()));
    }
    if name.len() > MAX_USER_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Name must be at most {MAX_USER_NAME_LEN} characters"
        )));
    }
    Ok(())
}
