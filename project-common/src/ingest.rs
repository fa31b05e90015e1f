use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{IngestError, Result};
use crate::models::{DateSource, ProjectRecord};

/// 缺少标题时使用的默认值
pub const DEFAULT_TITLE: &str = "Untitled project";

/// 数据表常见的行数组包装字段
const ENVELOPE_KEYS: &[&str] = &["list", "records", "rows"];

/// 字段映射 - 数据表列名到记录字段的对应关系
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RowMapping {
    pub id: Vec<String>,
    pub title: Vec<String>,
    pub description: Vec<String>,
    pub category: Vec<String>,
    pub industry: Vec<String>,
    pub time_updated: Vec<String>,
}

impl Default for RowMapping {
    fn default() -> Self {
        Self {
            id: columns(&["id", "Id"]),
            title: columns(&["title", "Title"]),
            description: columns(&["description", "Description"]),
            category: columns(&["category", "Category"]),
            industry: columns(&["industry", "Industry"]),
            time_updated: columns(&["time_updated", "timeUpdated", "updated_at", "UpdatedAt"]),
        }
    }
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

// 按映射顺序取第一个非 null 的列
fn lookup<'a>(row: &'a Value, candidates: &[String]) -> Option<&'a Value> {
    candidates
        .iter()
        .filter_map(|column| row.get(column))
        .find(|value| !value.is_null())
}

fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn tags_of(value: Option<&Value>) -> Vec<String> {
    let raw: Vec<String> = match value {
        Some(Value::Array(items)) => items.iter().filter_map(|v| text_of(Some(v))).collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };

    raw.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

fn date_of(value: Option<&Value>) -> Option<DateSource> {
    match value? {
        Value::Number(n) => n.as_f64().map(DateSource::from_number),
        Value::String(s) => DateSource::from_text(s),
        _ => None,
    }
}

/// 将数据表的一行转换为项目记录，缺失字段使用默认值
pub fn normalize_row(row: &Value, index: usize, mapping: &RowMapping) -> ProjectRecord {
    let id = text_of(lookup(row, &mapping.id))
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("project-{}", index));

    let title = text_of(lookup(row, &mapping.title))
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    ProjectRecord {
        id,
        title,
        description: text_of(lookup(row, &mapping.description)).unwrap_or_default(),
        category: text_of(lookup(row, &mapping.category)).unwrap_or_default(),
        industry: tags_of(lookup(row, &mapping.industry)),
        time_updated: date_of(lookup(row, &mapping.time_updated)),
    }
}

/// 转换整批行数据
///
/// 接受顶层数组，或带有 `list` / `records` / `rows` 数组的对象。非对象的行被跳过。
pub fn normalize_rows(payload: &Value, mapping: &RowMapping) -> Result<Vec<ProjectRecord>> {
    let rows = match payload {
        Value::Array(rows) => rows,
        Value::Object(map) => ENVELOPE_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .ok_or_else(|| IngestError::UnexpectedShape("object".to_string()))?,
        other => return Err(IngestError::UnexpectedShape(shape_name(other).to_string())),
    };

    Ok(rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.is_object())
        .map(|(i, row)| normalize_row(row, i, mapping))
        .collect())
}

/// 从 JSON 文本转换整批行数据
pub fn normalize_json(json: &str, mapping: &RowMapping) -> Result<Vec<ProjectRecord>> {
    let payload: Value = serde_json::from_str(json)?;
    normalize_rows(&payload, mapping)
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
