use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

// 国内手机号：010 / 011 / 016-019，可带连字符
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^01[016789]-?\d{3,4}-?\d{4}$").expect("Invalid phone regex")
});

const WEAK_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "12345678",
    "123456789",
    "qwerty123",
    "admin123",
    "abcd1234",
    "qwer1234",
    "asdf1234",
];

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度：4..=20
    if username.len() < 4 || username.len() > 20 {
        return Err("Username length must be between 4 and 20 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err(
            "Username must start with a letter and contain only letters, numbers or underscores",
        );
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.len() > 254 || !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if !PHONE_RE.is_match(phone) {
        return Err("Phone number must look like 010-1234-5678");
    }
    Ok(())
}

/// 密码策略：至少 8 个字符，同时包含字母和数字，不能是常见弱密码
pub fn validate_password(password: &str) -> Result<(), String> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if password.chars().count() > 128 {
        errors.push("Password must be at most 128 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        errors.push("Password must contain at least one letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }
    if WEAK_PASSWORDS
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

/// 标题类字段：去除空白后非空且不超过 max 个字符
pub fn validate_title(value: &str, field: &str, max: usize) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if trimmed.chars().count() > max {
        return Err(format!("{field} must be at most {max} characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("kim_01").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username("1abcdef").is_err());
        assert!(validate_username("kim-01").is_err());
        assert!(validate_username(&"a".repeat(21)).is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("kim@academy.co.kr").is_ok());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_phone_rules() {
        assert!(validate_phone("010-1234-5678").is_ok());
        assert!(validate_phone("01012345678").is_ok());
        assert!(validate_phone("011-123-4567").is_ok());
        assert!(validate_phone("02-123-4567").is_err());
        assert!(validate_phone("010-12-5678").is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("studyhard2024").is_ok());
        assert!(validate_password("Ab1").unwrap_err().contains("at least 8"));
        assert!(validate_password("onlyletters").unwrap_err().contains("digit"));
        assert!(validate_password("1234567890").unwrap_err().contains("letter"));
        assert!(validate_password("Qwer1234").unwrap_err().contains("too common"));
    }

    #[test]
    fn test_title_rules() {
        assert!(validate_title("토익 실전반", "title", 10).is_ok());
        assert!(validate_title("   ", "title", 10).is_err());
        assert!(validate_title("가나다라마바사아자차카", "title", 10).is_err());
    }
}
