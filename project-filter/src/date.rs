//! 日期区间匹配
//!
//! 区间按 UTC 日历日计算：开始日期从当天 00:00:00 起，结束日期到当天
//! 23:59:59.999999999 止，两端均包含。没有结束日期时只覆盖开始日期当天。

use chrono::{DateTime, NaiveDate, Utc};
use project_common::ProjectRecord;
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};

/// 日期区间
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    from: NaiveDate,
    to: Option<NaiveDate>,
}

// 反序列化与 `DateRange::parse` 接受同样的文本，但 `from` 不能为空
#[derive(Deserialize)]
struct RawDateRange {
    from: String,
    #[serde(default)]
    to: Option<String>,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = FilterError;

    fn try_from(raw: RawDateRange) -> Result<Self> {
        let from = parse_day(&raw.from)?;
        let to = raw
            .to
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_day)
            .transpose()?;
        DateRange::new(from, to)
    }
}

impl DateRange {
    /// 创建日期区间，结束日期早于开始日期时返回错误
    pub fn new(from: NaiveDate, to: Option<NaiveDate>) -> Result<Self> {
        if let Some(to) = to {
            if to < from {
                return Err(FilterError::InvertedDateRange { from, to });
            }
        }
        Ok(Self { from, to })
    }

    /// 只覆盖一天的区间
    pub fn single_day(day: NaiveDate) -> Self {
        Self { from: day, to: None }
    }

    /// 从文本解析区间，`from` 为空时返回 None（不筛选）
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Option<Self>> {
        let from = match from.map(str::trim).filter(|s| !s.is_empty()) {
            Some(text) => parse_day(text)?,
            None => return Ok(None),
        };
        let to = to
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_day)
            .transpose()?;
        Self::new(from, to).map(Some)
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    /// 区间最后一天
    pub fn last_day(&self) -> NaiveDate {
        self.to.unwrap_or(self.from)
    }

    /// 时间点是否落在区间内（两端包含）
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let day = instant.date_naive();
        day >= self.from && day <= self.last_day()
    }

    /// 记录的更新时间是否落在区间内，没有可解析日期的记录不匹配
    pub fn matches(&self, record: &ProjectRecord) -> bool {
        record.updated_at().is_some_and(|instant| self.contains(instant))
    }

    pub fn description(&self) -> String {
        format!("date({}..={})", self.from, self.last_day())
    }
}

/// 日期区间匹配：未设置区间时所有记录都匹配
pub fn matches_date(record: &ProjectRecord, range: Option<&DateRange>) -> bool {
    match range {
        Some(range) => range.matches(record),
        None => true,
    }
}

/// 解析日历日：`YYYY-MM-DD`，或 RFC 3339 时间（取其自身时区下的日期）
pub fn parse_day(input: &str) -> Result<NaiveDate> {
    let input = input.trim();

    if let Ok(day) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(day);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.date_naive());
    }

    Err(FilterError::InvalidDate(input.to_string()))
}
