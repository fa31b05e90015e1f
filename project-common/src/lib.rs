pub mod compression;
pub mod error;
pub mod ingest;
pub mod models;

// 重新导出常用类型和函数，方便直接使用
pub use compression::{
    from_binary, from_compressed, to_binary, to_compressed, validate_compressed_data,
};
pub use error::IngestError;
pub use ingest::{normalize_json, normalize_row, normalize_rows, RowMapping};
pub use models::{DateSource, ProjectRecord};
