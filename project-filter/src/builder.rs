use chrono::Utc;
use project_common::compression::{from_compressed, to_compressed};
use project_common::ProjectRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::composer::derive_vocabulary;
use crate::error::{FilterError, Result};
use crate::models::ProjectSnapshot;

/// 快照格式版本
pub const SNAPSHOT_VERSION: [u8; 2] = [1, 0];

impl ProjectSnapshot {
    /// 从压缩的二进制数据恢复快照
    pub fn from_compressed(data: &[u8]) -> Result<Self> {
        Ok(from_compressed(data)?)
    }
}

/// 项目快照构建器
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    projects: Vec<ProjectRecord>,
}

impl SnapshotBuilder {
    /// 创建新的快照构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加项目到构建器
    pub fn add_project(&mut self, project: ProjectRecord) {
        self.projects.push(project);
    }

    /// 批量添加项目
    pub fn extend<I: IntoIterator<Item = ProjectRecord>>(&mut self, projects: I) {
        self.projects.extend(projects);
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// 构建快照
    pub fn build_snapshot(&self) -> Result<ProjectSnapshot> {
        if self.projects.is_empty() {
            eprintln!("错误: 无法构建快照，没有项目数据");
            return Err(FilterError::EmptySnapshot);
        }

        println!("开始构建项目快照，项目数量: {}", self.projects.len());

        let vocabulary = derive_vocabulary(&self.projects);

        println!(
            "快照构建完成，分类数量: {}, 行业数量: {}",
            vocabulary.categories.len(),
            vocabulary.industries.len()
        );

        Ok(ProjectSnapshot {
            projects: self.projects.clone(),
            vocabulary,
            created_at: Utc::now(),
        })
    }

    /// 构建并压缩快照
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let snapshot = self.build_snapshot()?;
        Ok(to_compressed(&snapshot, SNAPSHOT_VERSION)?)
    }

    /// 保存快照到文件，返回写入的字节数
    pub fn save_snapshot(&self, path: &Path) -> Result<usize> {
        println!("开始保存项目快照到文件: {}", path.display());

        let compressed_data = self.to_bytes().map_err(|e| {
            eprintln!("构建项目快照失败: {}", e);
            e
        })?;
        println!("数据压缩成功，压缩后大小: {} 字节", compressed_data.len());

        let mut file = File::create(path)?;
        file.write_all(&compressed_data)?;

        println!("项目快照已成功写入文件: {}，大小: {} 字节", path.display(), compressed_data.len());
        Ok(compressed_data.len())
    }
}
