use wasm_bindgen::prelude::*;
use once_cell::sync::OnceCell;
use std::sync::Mutex;
use project_common::{normalize_json, ProjectRecord};

// 导出模块
pub mod builder;
pub mod composer;
pub mod config;
pub mod date;
pub mod error;
pub mod models;
pub mod predicates;
pub mod session;
pub mod state;

pub use composer::{apply_filters, apply_filters_with, count_active_filters, derive_vocabulary};
pub use config::{FilterConfig, SearchScope};
pub use date::{matches_date, DateRange};
pub use error::{FilterError, Result};
pub use models::{FilterResult, ProjectSnapshot, Vocabulary};
pub use session::FilterSession;
pub use state::{FilterAction, FilterDimension, FilterParams, FilterState};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

// 全局会话存储
static SESSION: OnceCell<Mutex<Option<FilterSession>>> = OnceCell::new();

/// 初始化函数 - 设置错误处理
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// 版本信息
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// 输出日志：浏览器中写入控制台，其它环境写入标准错误
pub(crate) fn log(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{}", message);
}

/// 项目过滤器 - 管理全局会话
pub struct ProjectFilter;

impl ProjectFilter {
    /// 用新会话替换全局会话
    pub fn install(session: FilterSession) -> Result<usize> {
        let count = session.records().len();
        let cell = SESSION.get_or_init(|| Mutex::new(None));
        let mut guard = cell.lock().map_err(|_| FilterError::LockPoisoned)?;
        *guard = Some(session);
        log(&format!("项目过滤器已加载，项目数量: {}", count));
        Ok(count)
    }

    /// 从数据表返回的 JSON 加载记录
    pub fn load_records(records_json: &str, config_json: Option<&str>) -> Result<usize> {
        let config = FilterConfig::from_json(config_json)?;
        let records = normalize_json(records_json, &config.mapping)?;
        Self::install(FilterSession::with_scope(records, config.search_scope))
    }

    /// 从压缩快照加载记录
    pub fn load_snapshot(data: &[u8], config_json: Option<&str>) -> Result<usize> {
        let config = FilterConfig::from_json(config_json)?;
        let snapshot = ProjectSnapshot::from_compressed(data).map_err(|e| {
            log(&format!("快照解析失败: {}", e));
            e
        })?;
        Self::install(FilterSession::from_snapshot(snapshot, config.search_scope))
    }

    fn with_session<R>(f: impl FnOnce(&mut FilterSession) -> R) -> Result<R> {
        let cell = SESSION.get().ok_or(FilterError::NotInitialized)?;
        let mut guard = cell.lock().map_err(|_| FilterError::LockPoisoned)?;
        let session = guard.as_mut().ok_or(FilterError::NotInitialized)?;
        Ok(f(session))
    }

    /// 按给定参数筛选，不改变会话状态
    pub fn filter_projects(params: &FilterParams) -> Result<FilterResult> {
        let state = FilterState::try_from(params.clone())?;
        Self::with_session(|session| {
            let projects: Vec<ProjectRecord> =
                apply_filters_with(session.records(), &state, session.scope())
                    .into_iter()
                    .cloned()
                    .collect();
            FilterResult {
                total: projects.len(),
                projects,
                active_filters: state.active_filter_count(),
                time_ms: 0.0,
            }
        })
    }

    /// 执行会话状态转换
    pub fn dispatch(action: FilterAction) -> Result<FilterResult> {
        Self::with_session(|session| {
            session.dispatch(action);
            session.result()
        })
    }

    /// 获取分类和行业词表
    pub fn vocabulary() -> Result<Vocabulary> {
        Self::with_session(|session| session.vocabulary().clone())
    }

    /// 获取当前会话状态
    pub fn state() -> Result<FilterState> {
        Self::with_session(|session| session.state().clone())
    }
}

fn to_js_error(e: FilterError) -> JsValue {
    log(&format!("项目过滤器错误: {}", e));
    JsValue::from_str(&e.to_string())
}

fn to_js<T: serde::Serialize>(value: &T) -> std::result::Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("序列化结果失败: {}", e)))
}

/// 项目过滤器JS接口 - 提供给JavaScript使用的筛选API
#[wasm_bindgen]
pub struct ProjectFilterJS;

#[wasm_bindgen]
impl ProjectFilterJS {
    /// 加载 fetchRecords 返回的记录，返回记录数量
    #[wasm_bindgen]
    pub fn init(records_json: &str, config_json: Option<String>) -> std::result::Result<usize, JsValue> {
        console_error_panic_hook::set_once();
        ProjectFilter::load_records(records_json, config_json.as_deref()).map_err(to_js_error)
    }

    /// 加载压缩快照，返回记录数量
    #[wasm_bindgen]
    pub fn init_snapshot(data: &[u8], config_json: Option<String>) -> std::result::Result<usize, JsValue> {
        console_error_panic_hook::set_once();
        ProjectFilter::load_snapshot(data, config_json.as_deref()).map_err(to_js_error)
    }

    /// 按参数筛选项目
    #[wasm_bindgen]
    pub fn filter_projects(params_json: &str) -> std::result::Result<JsValue, JsValue> {
        let start = js_sys::Date::now();
        let params: FilterParams = serde_json::from_str(params_json)
            .map_err(|e| to_js_error(FilterError::Params(e)))?;

        let mut result = ProjectFilter::filter_projects(&params).map_err(to_js_error)?;
        result.time_ms = js_sys::Date::now() - start;
        to_js(&result)
    }

    /// 执行会话动作，例如 `{"type":"setIndustry","value":"NGO"}`
    #[wasm_bindgen]
    pub fn dispatch(action_json: &str) -> std::result::Result<JsValue, JsValue> {
        let start = js_sys::Date::now();
        let action: FilterAction = serde_json::from_str(action_json)
            .map_err(|e| to_js_error(FilterError::Params(e)))?;

        let mut result = ProjectFilter::dispatch(action).map_err(to_js_error)?;
        result.time_ms = js_sys::Date::now() - start;
        to_js(&result)
    }

    /// 获取分类和行业词表
    #[wasm_bindgen]
    pub fn vocabulary() -> std::result::Result<JsValue, JsValue> {
        let vocabulary = ProjectFilter::vocabulary().map_err(to_js_error)?;
        to_js(&vocabulary)
    }

    /// 获取当前会话状态
    #[wasm_bindgen]
    pub fn state() -> std::result::Result<JsValue, JsValue> {
        let state = ProjectFilter::state().map_err(to_js_error)?;
        to_js(&state)
    }

    /// 统计激活的筛选维度数量
    #[wasm_bindgen]
    pub fn count_active_filters(params_json: &str) -> std::result::Result<usize, JsValue> {
        FilterParams::parse_state(params_json)
            .map(|state| count_active_filters(&state))
            .map_err(to_js_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 全局会话只在这一个测试中使用，避免并行测试互相干扰
    #[test]
    fn global_session_lifecycle() {
        let rows = r#"[
            {"title": "North", "category": "A", "industry": ["X"]},
            {"title": "South", "category": "B", "industry": "Y, X"}
        ]"#;
        assert_eq!(ProjectFilter::load_records(rows, None).unwrap(), 2);

        let vocabulary = ProjectFilter::vocabulary().unwrap();
        assert_eq!(vocabulary.industries, vec!["X", "Y"]);

        let params = FilterParams {
            selected_industry: Some("Y".into()),
            ..FilterParams::default()
        };
        let result = ProjectFilter::filter_projects(&params).unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.projects[0].title, "South");
        // 无状态筛选不影响会话
        assert_eq!(ProjectFilter::state().unwrap(), FilterState::default());

        let result = ProjectFilter::dispatch(FilterAction::SetCategory(Some("A".into()))).unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.active_filters, 1);

        let result = ProjectFilter::dispatch(FilterAction::ClearAll).unwrap();
        assert_eq!(result.total, 2);

        assert!(matches!(
            ProjectFilter::load_records("{\"data\": 1}", None),
            Err(FilterError::Ingest(_))
        ));
    }
}
