pub mod user_agent;

pub use user_agent::classify_device;

use chrono::Utc;

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    // 随机选择字母和数字
    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    // 生成指定长度的随机字符串
    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

/// 为匿名观看者生成会话键
///
/// 随机串 + 毫秒时间戳，在 24 小时去重窗口内足够避免碰撞。
pub fn generate_session_key() -> String {
    format!(
        "session_{}_{}",
        generate_random_code(9),
        Utc::now().timestamp_millis()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_code_length() {
        assert_eq!(generate_random_code(9).len(), 9);
        assert_eq!(generate_random_code(0).len(), 0);
    }

    #[test]
    fn test_generate_random_code_charset() {
        let code = generate_random_code(64);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_session_keys_are_distinct() {
        let a = generate_session_key();
        let b = generate_session_key();
        assert!(a.starts_with("session_"));
        assert_ne!(a, b);
    }
}
