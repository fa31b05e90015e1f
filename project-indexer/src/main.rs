use std::fs;
use std::path::{Path, PathBuf};
use clap::{Arg, ArgAction, Command};
use walkdir::WalkDir;

use project_common::{normalize_json, ProjectRecord, RowMapping};
use project_filter::builder::SnapshotBuilder;

/// 输出文件名
const SNAPSHOT_FILE: &str = "projects.bin";

fn cli() -> Command {
    Command::new("项目快照生成器")
        .version(env!("CARGO_PKG_VERSION"))
        .about("将数据表导出的 JSON 行数据转换为客户端可直接加载的项目快照")
        .arg(Arg::new("source")
            .short('s')
            .long("source")
            .value_name("SOURCE")
            .help("JSON 文件或包含 JSON 文件的目录")
            .required(true))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("OUTPUT_DIR")
            .help("快照输出目录路径")
            .required(true))
        .arg(Arg::new("mapping")
            .short('m')
            .long("mapping")
            .value_name("MAPPING_JSON")
            .help("列名映射配置文件"))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("显示详细信息")
            .action(ArgAction::SetTrue))
}

fn main() {
    let matches = cli().get_matches();

    // required 参数由 clap 保证存在
    let source = PathBuf::from(matches.get_one::<String>("source").cloned().unwrap_or_default());
    let output = PathBuf::from(matches.get_one::<String>("output").cloned().unwrap_or_default());
    let mapping_path = matches.get_one::<String>("mapping").map(PathBuf::from);
    let verbose = matches.get_flag("verbose");

    if !source.exists() {
        eprintln!("错误: 数据源不存在 '{}'", source.display());
        std::process::exit(1);
    }

    if let Err(e) = fs::create_dir_all(&output) {
        eprintln!("错误: 无法创建输出目录 '{}': {}", output.display(), e);
        std::process::exit(1);
    }

    println!("开始生成项目快照...");
    println!("数据源: {}", source.display());
    println!("输出目录: {}", output.display());

    match generate_snapshot(&source, &output, mapping_path.as_deref(), verbose) {
        Ok(path) => println!("快照生成成功: {}", path.display()),
        Err(e) => {
            eprintln!("错误: 快照生成失败: {}", e);
            std::process::exit(1);
        }
    }
}

/// 读取列名映射，未指定时使用默认映射
fn load_mapping(path: Option<&Path>) -> Result<RowMapping, String> {
    let Some(path) = path else {
        return Ok(RowMapping::default());
    };
    let text = fs::read_to_string(path)
        .map_err(|e| format!("无法读取映射文件 {}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("映射文件格式错误 {}: {}", path.display(), e))
}

/// 生成快照并返回输出文件路径
fn generate_snapshot(
    source: &Path,
    output_dir: &Path,
    mapping_path: Option<&Path>,
    verbose: bool,
) -> Result<PathBuf, String> {
    let start_time = std::time::Instant::now();
    let mapping = load_mapping(mapping_path)?;

    println!("扫描 JSON 文件...");
    let (projects, skipped_count) = scan_json_files(source, &mapping, verbose)?;
    println!("扫描完成。找到 {} 个项目，跳过 {} 个文件。", projects.len(), skipped_count);

    if projects.is_empty() {
        return Err("没有找到有效项目".to_string());
    }

    let mut builder = SnapshotBuilder::new();
    builder.extend(projects);

    let snapshot_path = output_dir.join(SNAPSHOT_FILE);
    builder.save_snapshot(&snapshot_path).map_err(|e| e.to_string())?;

    let elapsed = start_time.elapsed();
    println!("快照生成完成！耗时: {:.2}秒", elapsed.as_secs_f32());

    Ok(snapshot_path)
}

/// 扫描 JSON 文件并转换为项目记录，返回 (项目, 跳过的文件数)
fn scan_json_files(
    source: &Path,
    mapping: &RowMapping,
    verbose: bool,
) -> Result<(Vec<ProjectRecord>, usize), String> {
    let mut projects = Vec::new();
    let mut skipped = 0;

    // 按文件名排序，保证多次生成的记录顺序一致
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|e| format!("遍历目录时出错: {}", e))?;

        if !entry.file_type().is_file() || !entry.path().extension().is_some_and(|ext| ext == "json") {
            continue;
        }

        match read_projects(entry.path(), mapping) {
            Ok(records) => {
                if verbose {
                    println!("处理: {} ({} 个项目)", entry.path().display(), records.len());
                }
                projects.extend(records);
            }
            Err(err) => {
                skipped += 1;
                if verbose {
                    eprintln!("解析文件时出错 {}: {}", entry.path().display(), err);
                }
            }
        }
    }

    Ok((projects, skipped))
}

fn read_projects(path: &Path, mapping: &RowMapping) -> Result<Vec<ProjectRecord>, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("无法读取文件 {}: {}", path.display(), e))?;
    normalize_json(&text, mapping).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use project_filter::ProjectSnapshot;

    const ROWS: &str = r#"[{"title": "Marketing Campaign Hub", "industry": ["FMCG"]}]"#;

    #[test]
    fn cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn scans_directories_and_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), ROWS).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(
            dir.path().join("nested/b.json"),
            r#"{"records": [{"Title": "Sales Enablement Hub"}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("broken.json"), "{").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let (projects, skipped) = scan_json_files(dir.path(), &RowMapping::default(), false).unwrap();
        let titles: Vec<_> = projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Marketing Campaign Hub", "Sales Enablement Hub"]);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn generates_loadable_snapshot() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let file = source.path().join("rows.json");
        fs::write(&file, ROWS).unwrap();

        let path = generate_snapshot(&file, output.path(), None, true).unwrap();
        assert_eq!(path, output.path().join(SNAPSHOT_FILE));

        let snapshot = ProjectSnapshot::from_compressed(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(snapshot.projects[0].title, "Marketing Campaign Hub");
        assert_eq!(snapshot.vocabulary.industries, vec!["FMCG"]);
    }

    #[test]
    fn custom_mapping_file() {
        let dir = tempfile::tempdir().unwrap();
        let mapping_file = dir.path().join("mapping.json");
        fs::write(&mapping_file, r#"{"title": ["Name"]}"#).unwrap();
        let mapping = load_mapping(Some(mapping_file.as_path())).unwrap();
        assert_eq!(mapping.title, vec!["Name"]);

        assert!(load_mapping(Some(dir.path().join("missing.json").as_path())).is_err());
    }

    #[test]
    fn empty_source_is_an_error() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let err = generate_snapshot(source.path(), output.path(), None, false).unwrap_err();
        assert!(err.contains("没有找到有效项目"));
    }
}
