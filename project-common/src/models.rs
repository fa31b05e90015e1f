use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// 秒/毫秒时间戳的分界值：小于该值视为秒，否则视为毫秒
pub const SECONDS_THRESHOLD: f64 = 10_000_000_000.0;

/// 带时区偏移（`Z` 或 `±hh:mm`）的日期时间格式
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y%m%dT%H%M%S%#z",
];

/// 无时区信息的日期时间格式（按 UTC 解释）
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y%m%dT%H%M%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// 仅包含日期的格式（取当天 00:00:00 UTC）
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// 时间来源 - 记录更新时间在数据源中的原始编码
///
/// 导入时只判断一次类型，之后统一通过 [`DateSource::resolve`] 得到时间点。
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    /// RFC 3339 / ISO-8601 文本
    Iso(String),
    /// 其它任意日期文本
    Text(String),
    /// Unix 时间戳（秒）
    Seconds(f64),
    /// Unix 时间戳（毫秒）
    Millis(f64),
}

impl DateSource {
    /// 根据数值大小区分秒和毫秒
    pub fn from_number(value: f64) -> Self {
        if value < SECONDS_THRESHOLD {
            DateSource::Seconds(value)
        } else {
            DateSource::Millis(value)
        }
    }

    /// 从文本创建，空白文本返回 None
    pub fn from_text(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if DateTime::parse_from_rfc3339(value).is_ok() {
            Some(DateSource::Iso(value.to_string()))
        } else {
            Some(DateSource::Text(value.to_string()))
        }
    }

    /// 解析为 UTC 时间点，无法解析时返回 None
    pub fn resolve(&self) -> Option<DateTime<Utc>> {
        match self {
            DateSource::Iso(text) => parse_iso(text).or_else(|| parse_lenient(text)),
            DateSource::Text(text) => parse_lenient(text),
            DateSource::Seconds(secs) => from_millis(secs * 1000.0),
            DateSource::Millis(millis) => from_millis(*millis),
        }
    }
}

/// 严格按 RFC 3339 解析
pub fn parse_iso(input: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// 宽松解析常见的日期文本
pub fn parse_lenient(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(input, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }

    None
}

// 毫秒数截断为整数后转换，超出范围或非有限值返回 None
fn from_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    let millis = millis.trunc();
    if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

/// 项目记录 - 列表中展示和筛选的基本单位
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    /// 记录唯一标识符
    pub id: String,
    /// 项目标题
    pub title: String,
    /// 项目描述
    #[serde(default)]
    pub description: String,
    /// 分类（单值）
    #[serde(default)]
    pub category: String,
    /// 行业标签（多值）
    #[serde(default)]
    pub industry: Vec<String>,
    /// 最近更新时间
    #[serde(default)]
    pub time_updated: Option<DateSource>,
}

impl ProjectRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_industry<I, S>(mut self, industry: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.industry = industry.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_time_updated(mut self, source: DateSource) -> Self {
        self.time_updated = Some(source);
        self
    }

    /// 更新时间，缺失或无法解析时为 None
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.time_updated.as_ref().and_then(DateSource::resolve)
    }
}
