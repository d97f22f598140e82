use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "12345678",
    "123456789",
    "qwerty123",
    "admin123",
    "welcome1",
    "school123",
    "teacher1",
    "abcd1234",
];

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email.trim()) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 校验可选邮箱：空白视为未填写
pub fn validate_optional_email(email: Option<&str>) -> Result<(), &'static str> {
    match email.map(str::trim) {
        Some(e) if !e.is_empty() => validate_email(e),
        _ => Ok(()),
    }
}

/// 密码策略：至少 8 位，包含大小写字母和数字，且不在常见密码列表中
pub fn validate_password(password: &str) -> Result<(), String> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }
    if COMMON_PASSWORDS
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(validate_email("parent@school.org").is_ok());
        assert!(validate_email("  teacher.one+tag@north.edu.br ").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_optional_email() {
        assert!(validate_optional_email(None).is_ok());
        assert!(validate_optional_email(Some("   ")).is_ok());
        assert!(validate_optional_email(Some("broken@")).is_err());
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecurePass123").is_ok());
        assert!(validate_password("MyP@ssw0rd").is_ok());
    }

    #[test]
    fn test_password_rules() {
        let err = validate_password("Ab1").unwrap_err();
        assert!(err.contains("at least 8 characters"));

        let err = validate_password("abcd1234").unwrap_err();
        assert!(err.contains("uppercase"));
        assert!(err.contains("too common"));

        let err = validate_password("ABCDEFGH").unwrap_err();
        assert!(err.contains("lowercase"));
        assert!(err.contains("digit"));
    }

    #[test]
    fn test_common_password_case_insensitive() {
        let err = validate_password("School123").unwrap_err();
        assert_eq!(err, "Password is too common, please choose a stronger password");
    }
}
