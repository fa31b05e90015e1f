use chrono::NaiveDate;
use project_common::IngestError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("日期范围无效: 结束日期 {to} 早于开始日期 {from}")]
    InvertedDateRange { from: NaiveDate, to: NaiveDate },

    #[error("无法解析日期: {0}")]
    InvalidDate(String),

    #[error("解析参数失败: {0}")]
    Params(#[from] serde_json::Error),

    #[error("导入项目数据失败: {0}")]
    Ingest(#[from] IngestError),

    #[error("快照读写失败: {0}")]
    Snapshot(#[from] std::io::Error),

    #[error("无法构建快照: 没有项目数据")]
    EmptySnapshot,

    #[error("过滤器未初始化")]
    NotInitialized,

    #[error("获取过滤器锁失败")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, FilterError>;
