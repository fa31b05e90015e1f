use chrono::{DateTime, Utc};
use project_common::ProjectRecord;
use serde::{Deserialize, Serialize};

/// 可选的分类和行业 - 始终从完整记录集中提取
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    /// 去重并升序排列的分类
    pub categories: Vec<String>,
    /// 去重并升序排列的行业标签
    pub industries: Vec<String>,
}

/// 项目快照 - 离线生成、供客户端直接加载的数据
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProjectSnapshot {
    /// 所有项目记录（保持原始顺序）
    pub projects: Vec<ProjectRecord>,
    /// 从完整记录集提取的词表
    pub vocabulary: Vocabulary,
    /// 快照创建时间
    pub created_at: DateTime<Utc>,
}

/// 筛选结果 - 返回给客户端
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FilterResult {
    /// 筛选后的项目（保持原始顺序）
    pub projects: Vec<ProjectRecord>,
    /// 筛选结果总数
    pub total: usize,
    /// 激活的筛选维度数量
    pub active_filters: usize,
    /// 筛选耗时(毫秒)
    pub time_ms: f64,
}
