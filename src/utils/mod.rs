pub mod ip;
pub mod url_validator;

/// Code/alias constraints: lowercase alphanumeric plus hyphen, 3-20 chars.
pub const CODE_MIN_LENGTH: usize = 3;
pub const CODE_MAX_LENGTH: usize = 20;

/// Length of generated short codes (62^6 keyspace).
pub const GENERATED_CODE_LENGTH: usize = 6;

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    // 随机选择字母和数字
    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

/// Check whether a string is a valid short code or custom alias.
///
/// Generated codes are lowercased before storage, so the stored charset is
/// always `[a-z0-9-]`. User-supplied aliases must already match it; an
/// uppercase alias is rejected rather than silently normalized.
pub fn is_valid_code(code: &str) -> bool {
    (CODE_MIN_LENGTH..=CODE_MAX_LENGTH).contains(&code.len())
        && code
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
