//! Field checks shared by the dashboard forms. Each returns the message to
//! show, or `None` when the value is acceptable.

/// Characters that count as "special" for a strong password.
pub const PASSWORD_SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";

pub const MIN_PASSWORD_LEN: usize = 8;

/// Required text field with a max length.
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// `local@domain.tld`, no whitespace.
pub fn is_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    value.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && domain
                .rsplit_once('.')
                .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
    })
}

pub fn validate_email(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some("Email is required".to_string());
    }
    if !is_email(value) {
        return Some("Please enter a valid email address".to_string());
    }
    None
}

/// Ten digits, the first one 6-9.
pub fn validate_phone(value: &str) -> Option<String> {
    let value = value.trim();
    let mut digits = value.chars();
    let valid = value.len() == 10
        && value.chars().all(|c| c.is_ascii_digit())
        && digits.next().is_some_and(|c| ('6'..='9').contains(&c));
    if !valid {
        return Some("Phone number must be 10 digits starting with 6-9".to_string());
    }
    None
}

/// At least eight characters with an upper-case letter, a lower-case letter,
/// a digit and one of [`PASSWORD_SPECIALS`].
pub fn validate_password_strength(password: &str) -> Option<String> {
    let strong = password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c));
    if !strong {
        return Some(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters with upper and lower case letters, a digit and a special character"
        ));
    }
    None
}

/// Trimmed value, or `None` when blank.
pub fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields() {
        assert_eq!(validate_required("  ", "Roll number", 20).as_deref(), Some("Roll number is required"));
        assert!(validate_required("R-12", "Roll number", 20).is_none());
        assert!(validate_required(&"x".repeat(21), "Roll number", 20).is_some());
    }

    #[test]
    fn email_shapes() {
        assert!(is_email("ravi@school.edu"));
        assert!(!is_email("ravi@school"));
        assert!(!is_email("@school.edu"));
        assert!(!is_email("ravi @school.edu"));
        assert!(!is_email("ravi@.edu"));
        assert_eq!(validate_email("").as_deref(), Some("Email is required"));
    }

    #[test]
    fn phone_needs_ten_digits_from_six() {
        assert!(validate_phone("9876543210").is_none());
        assert!(validate_phone("6000000000").is_none());
        assert!(validate_phone("5876543210").is_some());
        assert!(validate_phone("987654321").is_some());
        assert!(validate_phone("98765-43210").is_some());
    }

    #[test]
    fn password_strength_rules() {
        assert!(validate_password_strength("Secret1!").is_none());
        assert!(validate_password_strength("secret1!").is_some());
        assert!(validate_password_strength("SECRET1!").is_some());
        assert!(validate_password_strength("Secret!!").is_some());
        assert!(validate_password_strength("Secret12").is_some());
        assert!(validate_password_strength("Se1!").is_some());
    }
}
