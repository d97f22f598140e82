use rand::{Rng, distr::Alphanumeric};

/// 签到码字符集：大写字母和数字
const SESSION_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// 生成签到码（大写字母和数字）
pub fn generate_session_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| SESSION_CODE_CHARSET[rng.random_range(0..SESSION_CODE_CHARSET.len())] as char)
        .collect()
}

/// 生成会话令牌（大小写字母和数字）
pub fn generate_session_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// 生成满足密码策略的随机密码
pub fn generate_random_password(len: usize) -> String {
    let len = len.max(8);
    let mut rng = rand::rng();
    loop {
        let candidate: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect();
        if crate::utils::validate::validate_password(&candidate).is_ok() {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_code_charset_and_length() {
        let code = generate_session_code(8);
        assert_eq!(code.len(), 8);
        assert!(
            code.chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_session_token() {
        let a = generate_session_token(64);
        let b = generate_session_token(64);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_random_password_passes_policy() {
        let password = generate_random_password(16);
        assert_eq!(password.len(), 16);
        assert!(crate::utils::validate::validate_password(&password).is_ok());
    }
}
