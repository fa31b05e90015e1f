//! 组合筛选
//!
//! 依次应用日期、搜索、分类、行业四个条件（逻辑与），每一步只在上一步留下的
//! 候选记录上进行。结果保持记录的原始顺序。

use std::collections::BTreeSet;

use project_common::ProjectRecord;

use crate::config::SearchScope;
use crate::models::Vocabulary;
use crate::predicates::{matches_category, matches_industry, SearchQuery};
use crate::state::FilterState;

/// 计算通过筛选的记录下标（升序）
pub fn filter_indices(records: &[ProjectRecord], state: &FilterState, scope: SearchScope) -> Vec<usize> {
    let mut candidate_ids: Vec<usize> = (0..records.len()).collect();

    if let Some(range) = state.date_range() {
        candidate_ids.retain(|&id| range.matches(&records[id]));
    }

    let query = SearchQuery::new(state.search_term(), scope);
    if !query.is_empty() {
        candidate_ids.retain(|&id| query.matches(&records[id]));
    }

    if let Some(category) = state.category() {
        candidate_ids.retain(|&id| matches_category(&records[id], Some(category)));
    }

    if let Some(industry) = state.industry() {
        candidate_ids.retain(|&id| matches_industry(&records[id], Some(industry)));
    }

    candidate_ids
}

/// 按默认搜索范围筛选记录
pub fn apply_filters<'a>(records: &'a [ProjectRecord], state: &FilterState) -> Vec<&'a ProjectRecord> {
    apply_filters_with(records, state, SearchScope::default())
}

/// 按指定搜索范围筛选记录
pub fn apply_filters_with<'a>(
    records: &'a [ProjectRecord],
    state: &FilterState,
    scope: SearchScope,
) -> Vec<&'a ProjectRecord> {
    filter_indices(records, state, scope)
        .into_iter()
        .map(|id| &records[id])
        .collect()
}

/// 从完整记录集提取分类和行业词表（忽略空值）
pub fn derive_vocabulary(records: &[ProjectRecord]) -> Vocabulary {
    let categories: BTreeSet<&str> = records
        .iter()
        .map(|record| record.category.as_str())
        .filter(|category| !category.is_empty())
        .collect();

    let industries: BTreeSet<&str> = records
        .iter()
        .flat_map(|record| record.industry.iter().map(String::as_str))
        .filter(|industry| !industry.is_empty())
        .collect();

    Vocabulary {
        categories: categories.into_iter().map(str::to_string).collect(),
        industries: industries.into_iter().map(str::to_string).collect(),
    }
}

/// 激活的筛选维度数量
pub fn count_active_filters(state: &FilterState) -> usize {
    state.active_filter_count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::DateRange;
    use chrono::NaiveDate;
    use project_common::DateSource;

    fn records() -> Vec<ProjectRecord> {
        vec![
            ProjectRecord::new("a", "Alpha board")
                .with_category("Ops")
                .with_industry(["Retail"])
                .with_time_updated(DateSource::Iso("2024-03-15T09:00:00Z".into())),
            ProjectRecord::new("b", "Beta board")
                .with_category("Sales")
                .with_industry(["Retail", "Finance"]),
            ProjectRecord::new("c", "Gamma tracker")
                .with_category("Ops")
                .with_industry(["Finance"])
                .with_time_updated(DateSource::Seconds(1_710_500_000.0)),
        ]
    }

    fn titles(filtered: &[&ProjectRecord]) -> Vec<String> {
        filtered.iter().map(|r| r.title.clone()).collect()
    }

    #[test]
    fn default_state_returns_everything_in_order() {
        let records = records();
        let filtered = apply_filters(&records, &FilterState::default());
        assert_eq!(titles(&filtered), vec!["Alpha board", "Beta board", "Gamma tracker"]);
    }

    #[test]
    fn dimensions_combine_with_and() {
        let records = records();
        let state = FilterState::new()
            .with_search("board")
            .with_industry(Some("Retail".into()));
        assert_eq!(titles(&apply_filters(&records, &state)), vec!["Alpha board", "Beta board"]);

        let state = state.with_category(Some("Sales".into()));
        assert_eq!(titles(&apply_filters(&records, &state)), vec!["Beta board"]);

        let state = state.with_search("gamma");
        assert!(apply_filters(&records, &state).is_empty());
    }

    #[test]
    fn date_stage_drops_undated_records() {
        let records = records();
        // 1_710_500_000 = 2024-03-15T10:53:20Z
        let range = DateRange::single_day(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        let state = FilterState::new().with_date_range(Some(range));
        assert_eq!(titles(&apply_filters(&records, &state)), vec!["Alpha board", "Gamma tracker"]);
        assert_eq!(filter_indices(&records, &state, SearchScope::default()), vec![0, 2]);
    }

    #[test]
    fn empty_input() {
        assert!(apply_filters(&[], &FilterState::new().with_search("x")).is_empty());
        assert_eq!(derive_vocabulary(&[]), Vocabulary::default());
    }

    #[test]
    fn vocabulary_is_sorted_distinct_and_non_empty() {
        let mut records = records();
        records.push(ProjectRecord::new("d", "Blank").with_industry(["", "Agriculture"]));
        let vocabulary = derive_vocabulary(&records);
        assert_eq!(vocabulary.categories, vec!["Ops", "Sales"]);
        assert_eq!(vocabulary.industries, vec!["Agriculture", "Finance", "Retail"]);
    }

    #[test]
    fn active_filter_count_matches_state() {
        let state = FilterState::new()
            .with_search("x")
            .with_industry(Some("Health".into()));
        assert_eq!(count_active_filters(&state), 2);
    }
}
