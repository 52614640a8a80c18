use chrono::{DateTime, Datelike, NaiveDate};
use utils_common::PostDate;

/// 完整日期格式，例如 "October 11, 2025"
const LONG_FORMAT: &str = "%B %-d, %Y";

/// 格式化文章日期
///
/// - 单个日期: "October 11, 2025"
/// - 同年同月的范围: "12 to 29 August 2025"
/// - 跨月或跨年的范围: "August 12, 2025 to September 5, 2025"
///
/// 无法解析的日期原样返回。
pub fn format_date(date: &PostDate) -> String {
    match date {
        PostDate::Single(value) => format_single(value),
        PostDate::Range { start, end } => format_range(start, end),
    }
}

fn format_single(value: &str) -> String {
    match parse_date(value) {
        Some(date) => date.format(LONG_FORMAT).to_string(),
        None => value.to_string(),
    }
}

fn format_range(start: &str, end: &str) -> String {
    let (Some(start_date), Some(end_date)) = (parse_date(start), parse_date(end)) else {
        return format!("{} to {}", format_single(start), format_single(end));
    };

    if start_date.year() == end_date.year() && start_date.month() == end_date.month() {
        format!(
            "{} to {} {}",
            start_date.day(),
            end_date.day(),
            end_date.format("%B %Y")
        )
    } else {
        format!(
            "{} to {}",
            start_date.format(LONG_FORMAT),
            end_date.format(LONG_FORMAT)
        )
    }
}

/// 接受 `YYYY-MM-DD` 或 RFC 3339 时间（只取日期部分）
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}
