/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a short prefixed resource id such as `ORD-3FA2C1`.
///
/// The suffix is the first `len` hex digits of a random v4 UUID, upper-cased.
/// `len` is clamped to 32.
pub fn prefixed_id(prefix: &str, len: usize) -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{prefix}-{}", &hex[..len.min(hex.len())])
}

/// Random v4 UUID string, for records without a readable prefix
pub fn uuid_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
