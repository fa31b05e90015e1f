use thiserror::Error;

/// 行数据导入错误
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("无法解析 JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("不支持的数据结构: 期望数组或包含 list/records/rows 的对象，实际为 {0}")]
    UnexpectedShape(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;
