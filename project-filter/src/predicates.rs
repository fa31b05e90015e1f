//! 属性筛选条件：搜索词、分类、行业。每个条件在未激活时匹配所有记录。

use project_common::ProjectRecord;

use crate::config::SearchScope;

/// 规范化后的搜索词（去除首尾空白并转小写）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
    scope: SearchScope,
}

impl SearchQuery {
    pub fn new(term: &str, scope: SearchScope) -> Self {
        Self {
            needle: term.trim().to_lowercase(),
            scope,
        }
    }

    /// 空搜索词不做任何筛选
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, record: &ProjectRecord) -> bool {
        if self.needle.is_empty() {
            return true;
        }

        let contains = |text: &str| text.to_lowercase().contains(&self.needle);

        contains(&record.title)
            || contains(&record.description)
            || (self.scope == SearchScope::IncludeIndustry
                && record.industry.iter().any(|tag| contains(tag)))
    }
}

/// 分类匹配：未选择时全部匹配，否则精确匹配（区分大小写）
pub fn matches_category(record: &ProjectRecord, selected: Option<&str>) -> bool {
    selected.map_or(true, |category| record.category == category)
}

/// 行业匹配：未选择时全部匹配，否则要求记录的行业标签包含该值
pub fn matches_industry(record: &ProjectRecord, selected: Option<&str>) -> bool {
    selected.map_or(true, |industry| record.industry.iter().any(|tag| tag == industry))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hub() -> ProjectRecord {
        ProjectRecord::new("1", "Marketing Campaign Hub")
            .with_description("Plan and track multi-channel campaigns")
            .with_category("Marketing")
            .with_industry(["FMCG", "Health"])
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let query = SearchQuery::new("CAMPAIGN", SearchScope::default());
        assert!(query.matches(&hub()));

        let query = SearchQuery::new("  multi-CHANNEL ", SearchScope::default());
        assert!(query.matches(&hub()));

        let query = SearchQuery::new("portal", SearchScope::default());
        assert!(!query.matches(&hub()));
    }

    #[test]
    fn blank_search_matches_everything() {
        for term in ["", "   ", "\t\n"] {
            let query = SearchQuery::new(term, SearchScope::default());
            assert!(query.is_empty());
            assert!(query.matches(&ProjectRecord::default()));
        }
    }

    #[test]
    fn search_ignores_industry_unless_configured() {
        let narrow = SearchQuery::new("health", SearchScope::TitleAndDescription);
        assert!(!narrow.matches(&hub()));

        let broad = SearchQuery::new("health", SearchScope::IncludeIndustry);
        assert!(broad.matches(&hub()));
    }

    #[test]
    fn category_is_exact() {
        assert!(matches_category(&hub(), None));
        assert!(matches_category(&hub(), Some("Marketing")));
        assert!(!matches_category(&hub(), Some("marketing")));
        assert!(!matches_category(&hub(), Some("Sales")));
    }

    #[test]
    fn literal_all_is_a_real_category() {
        let record = ProjectRecord::new("2", "Everything").with_category("all");
        assert!(matches_category(&record, Some("all")));
        assert!(!matches_category(&hub(), Some("all")));
    }

    #[test]
    fn industry_membership() {
        assert!(matches_industry(&hub(), None));
        assert!(matches_industry(&hub(), Some("Health")));
        assert!(!matches_industry(&hub(), Some("NGO")));
        assert!(!matches_industry(&ProjectRecord::default(), Some("Health")));
    }
}
