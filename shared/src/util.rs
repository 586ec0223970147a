//! Small shared utilities

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Alphabet for short id suffixes.
///
/// Uppercase + digits with ambiguous characters (0/O, 1/I) removed so the
/// id survives being read aloud at a pickup counter.
const SUFFIX_ALPHABET: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";

/// Generate a human-readable, date-prefixed short order id.
///
/// Format: `ORD-YYYYMMDD-XXXXXX` where the suffix is 6 random characters
/// from [`SUFFIX_ALPHABET`]. Uniqueness is enforced by the caller against
/// storage; the ~1 billion suffix space makes same-day collisions rare.
pub fn order_short_id() -> String {
    use rand::Rng;
    let date = chrono::Local::now().format("%Y%m%d");
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("ORD-{}-{}", date, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_short_id_shape() {
        let id = order_short_id();
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ORD");
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2].bytes().all(|b| SUFFIX_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_order_short_id_varies() {
        let a = order_short_id();
        let b = order_short_id();
        // Same date prefix, different random suffix (overwhelmingly likely)
        assert_eq!(&a[..12], &b[..12]);
        assert_ne!(a, b);
    }
}
