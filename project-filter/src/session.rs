//! 筛选会话
//!
//! 持有完整记录集、当前筛选状态和筛选结果。每个动作只触发一次重新计算，
//! 因此 `ClearAll` 不会产生部分清除的中间结果。

use project_common::ProjectRecord;

use crate::composer::{derive_vocabulary, filter_indices};
use crate::config::SearchScope;
use crate::models::{FilterResult, ProjectSnapshot, Vocabulary};
use crate::state::{FilterAction, FilterState};

#[derive(Debug, Clone)]
pub struct FilterSession {
    records: Vec<ProjectRecord>,
    vocabulary: Vocabulary,
    state: FilterState,
    scope: SearchScope,
    visible: Vec<usize>,
    recomputations: usize,
}

impl FilterSession {
    /// 以默认筛选状态创建会话
    pub fn new(records: Vec<ProjectRecord>) -> Self {
        Self::with_scope(records, SearchScope::default())
    }

    pub fn with_scope(records: Vec<ProjectRecord>, scope: SearchScope) -> Self {
        let vocabulary = derive_vocabulary(&records);
        Self::assemble(records, vocabulary, scope)
    }

    /// 从快照创建会话，直接使用快照中生成好的词表
    pub fn from_snapshot(snapshot: ProjectSnapshot, scope: SearchScope) -> Self {
        Self::assemble(snapshot.projects, snapshot.vocabulary, scope)
    }

    fn assemble(records: Vec<ProjectRecord>, vocabulary: Vocabulary, scope: SearchScope) -> Self {
        let mut session = Self {
            records,
            vocabulary,
            state: FilterState::default(),
            scope,
            visible: Vec::new(),
            recomputations: 0,
        };
        session.recompute();
        session
    }

    fn recompute(&mut self) {
        self.visible = filter_indices(&self.records, &self.state, self.scope);
        self.recomputations += 1;
    }

    /// 执行一个状态转换并重新计算
    pub fn dispatch(&mut self, action: FilterAction) -> &FilterState {
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(action);
        self.recompute();
        &self.state
    }

    /// 整体替换筛选状态
    pub fn set_state(&mut self, state: FilterState) {
        self.state = state;
        self.recompute();
    }

    /// 替换记录集（例如重新获取数据后），词表随之更新
    pub fn replace_records(&mut self, records: Vec<ProjectRecord>) {
        self.vocabulary = derive_vocabulary(&records);
        self.records = records;
        self.recompute();
    }

    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn scope(&self) -> SearchScope {
        self.scope
    }

    /// 当前可见的记录（原始顺序）
    pub fn visible(&self) -> Vec<&ProjectRecord> {
        self.visible.iter().map(|&id| &self.records[id]).collect()
    }

    /// 可见记录数量
    pub fn total(&self) -> usize {
        self.visible.len()
    }

    pub fn active_filter_count(&self) -> usize {
        self.state.active_filter_count()
    }

    /// 已经执行的重新计算次数
    pub fn recompute_count(&self) -> usize {
        self.recomputations
    }

    /// 当前结果的快照
    pub fn result(&self) -> FilterResult {
        FilterResult {
            projects: self.visible().into_iter().cloned().collect(),
            total: self.total(),
            active_filters: self.active_filter_count(),
            time_ms: 0.0,
        }
    }
}
