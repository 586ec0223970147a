//! 本地时间工具
//!
//! 可售窗口与取餐号都以服务器本地时间为准：
//! 窗口用"当日秒数"比较，取餐号计数器按本地日期分键。

use chrono::Timelike;

/// 当前本地时间的当日秒数 (0..=86399)
pub fn local_day_seconds() -> u32 {
    let now = chrono::Local::now().time();
    now.hour() * 3600 + now.minute() * 60 + now.second()
}

/// 当前本地日期戳 "YYYY-MM-DD"
pub fn local_date_stamp() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_day_seconds_in_range() {
        let secs = local_day_seconds();
        assert!(secs <= 86_399);
    }

    #[test]
    fn test_local_date_stamp_shape() {
        let stamp = local_date_stamp();
        assert_eq!(stamp.len(), 10);
        assert_eq!(stamp.as_bytes()[4], b'-');
        assert_eq!(stamp.as_bytes()[7], b'-');
    }
}
