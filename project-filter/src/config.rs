use project_common::RowMapping;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// 搜索范围
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SearchScope {
    /// 只匹配标题和描述
    #[default]
    TitleAndDescription,
    /// 额外匹配行业标签
    IncludeIndustry,
}

/// 过滤器配置 - 初始化时由客户端传入，所有字段均有默认值
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterConfig {
    /// 搜索范围
    pub search_scope: SearchScope,
    /// 数据表列名映射
    pub mapping: RowMapping,
}

impl FilterConfig {
    /// 从 JSON 解析配置，空文本使用默认配置
    pub fn from_json(json: Option<&str>) -> Result<Self> {
        match json.map(str::trim) {
            Some(text) if !text.is_empty() => Ok(serde_json::from_str(text)?),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        assert_eq!(FilterConfig::from_json(None).unwrap(), FilterConfig::default());
        assert_eq!(FilterConfig::from_json(Some("  ")).unwrap(), FilterConfig::default());
        assert_eq!(FilterConfig::from_json(Some("{}")).unwrap(), FilterConfig::default());
    }

    #[test]
    fn search_scope_is_configurable() {
        let config = FilterConfig::from_json(Some(r#"{"searchScope":"includeIndustry"}"#)).unwrap();
        assert_eq!(config.search_scope, SearchScope::IncludeIndustry);
        assert_eq!(config.mapping, RowMapping::default());
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(FilterConfig::from_json(Some(r#"{"searchScope":"everything"}"#)).is_err());
    }
}
