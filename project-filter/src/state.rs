//! 筛选状态
//!
//! 状态是不可变的值：每次转换都返回新的 `FilterState`，不会原地修改。
//! 分类和行业在状态内部用 `None` 表示“全部”。客户端传来的 `"all"` 和空字符串
//! 在设置时统一转换为 `None`。

use serde::{Deserialize, Serialize};

use crate::date::DateRange;
use crate::error::{FilterError, Result};

/// 筛选维度
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FilterDimension {
    Search,
    Category,
    Industry,
    DateRange,
}

/// 状态转换动作
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum FilterAction {
    SetSearch(String),
    SetCategory(Option<String>),
    SetIndustry(Option<String>),
    SetDateRange(Option<DateRange>),
    Clear(FilterDimension),
    ClearAll,
}

/// 当前的筛选状态
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    search_term: String,
    category: Option<String>,
    industry: Option<String>,
    date_range: Option<DateRange>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn industry(&self) -> Option<&str> {
        self.industry.as_deref()
    }

    pub fn date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref()
    }

    pub fn with_search(self, term: impl Into<String>) -> Self {
        Self {
            search_term: term.into(),
            ..self
        }
    }

    /// 设置分类，`"all"` 或空白表示全部
    pub fn with_category(self, category: Option<String>) -> Self {
        Self {
            category: selection(category),
            ..self
        }
    }

    /// 设置行业，`"all"` 或空白表示全部
    pub fn with_industry(self, industry: Option<String>) -> Self {
        Self {
            industry: selection(industry),
            ..self
        }
    }

    pub fn with_date_range(self, date_range: Option<DateRange>) -> Self {
        Self { date_range, ..self }
    }

    /// 重置单个维度
    pub fn cleared(self, dimension: FilterDimension) -> Self {
        match dimension {
            FilterDimension::Search => self.with_search(String::new()),
            FilterDimension::Category => self.with_category(None),
            FilterDimension::Industry => self.with_industry(None),
            FilterDimension::DateRange => self.with_date_range(None),
        }
    }

    /// 重置所有维度
    pub fn cleared_all(self) -> Self {
        Self::default()
    }

    /// 执行一个状态转换
    pub fn apply(self, action: FilterAction) -> Self {
        match action {
            FilterAction::SetSearch(term) => self.with_search(term),
            FilterAction::SetCategory(category) => self.with_category(category),
            FilterAction::SetIndustry(industry) => self.with_industry(industry),
            FilterAction::SetDateRange(range) => self.with_date_range(range),
            FilterAction::Clear(dimension) => self.cleared(dimension),
            FilterAction::ClearAll => self.cleared_all(),
        }
    }

    /// 维度是否处于激活状态
    pub fn is_active(&self, dimension: FilterDimension) -> bool {
        match dimension {
            FilterDimension::Search => !self.search_term.trim().is_empty(),
            FilterDimension::Category => self.category.is_some(),
            FilterDimension::Industry => self.industry.is_some(),
            FilterDimension::DateRange => self.date_range.is_some(),
        }
    }

    /// 激活的筛选维度数量 (0..=4)
    pub fn active_filter_count(&self) -> usize {
        [
            FilterDimension::Search,
            FilterDimension::Category,
            FilterDimension::Industry,
            FilterDimension::DateRange,
        ]
        .into_iter()
        .filter(|dimension| self.is_active(*dimension))
        .count()
    }

    pub fn is_default(&self) -> bool {
        self.active_filter_count() == 0
    }
}

/// 日期区间参数 - 客户端传来的原始文本
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DateRangeParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// 筛选参数 - 客户端传递的筛选条件
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterParams {
    /// 搜索词
    pub search_term: String,
    /// 选中的分类，缺省、空字符串或 `"all"` 表示全部
    pub selected_category: Option<String>,
    /// 选中的行业，缺省、空字符串或 `"all"` 表示全部
    pub selected_industry: Option<String>,
    /// 日期区间，缺少 `from` 时不筛选
    pub date_range: Option<DateRangeParams>,
}

/// 客户端表示“全部”的取值
pub const ALL_SELECTION: &str = "all";

fn selection(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && v != ALL_SELECTION
    })
}

impl TryFrom<FilterParams> for FilterState {
    type Error = FilterError;

    fn try_from(params: FilterParams) -> Result<Self> {
        let date_range = match &params.date_range {
            Some(range) => DateRange::parse(range.from.as_deref(), range.to.as_deref())?,
            None => None,
        };

        Ok(FilterState::new()
            .with_search(params.search_term)
            .with_category(params.selected_category)
            .with_industry(params.selected_industry)
            .with_date_range(date_range))
    }
}

impl FilterParams {
    /// 从 JSON 文本解析并校验
    pub fn parse_state(json: &str) -> Result<FilterState> {
        let params: FilterParams = serde_json::from_str(json)?;
        FilterState::try_from(params)
    }
}
