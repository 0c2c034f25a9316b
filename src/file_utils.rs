use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};
use anyhow::{Context, Result};

const METADATA_DIR: &str = "metadata";
const EXPERIMENTS_DIR: &str = "experiments";
const HEARTBEATS_DIR: &str = "heartbeats";

/// 实验元数据目录：<repo>/metadata/experiments
pub fn experiments_dir(repository_dir: &Path) -> PathBuf {
    repository_dir.join(METADATA_DIR).join(EXPERIMENTS_DIR)
}

/// 实验心跳文件：<repo>/metadata/heartbeats/<id>.json
///
/// 实验ID来自元数据文件，不能包含路径分隔符，否则会跳出心跳目录。
pub fn heartbeat_file(repository_dir: &Path, experiment_id: &str) -> Result<PathBuf> {
    if experiment_id.is_empty()
        || experiment_id == "."
        || experiment_id == ".."
        || experiment_id.contains(['/', '\\'])
    {
        anyhow::bail!("Invalid experiment ID '{}'", experiment_id);
    }

    Ok(repository_dir
        .join(METADATA_DIR)
        .join(HEARTBEATS_DIR)
        .join(format!("{}.json", experiment_id)))
}

/// 收集实验元数据目录下所有 <id>.json 文件，按文件名排序
///
/// 目录不存在时表示仓库里还没有实验，返回空列表。
/// 读取目录出错（包括指向不存在目标的符号链接）会直接返回错误。
pub fn find_experiment_files(experiments_dir: &Path) -> Result<Vec<PathBuf>> {
    if !experiments_dir.exists() {
        return Ok(Vec::new());
    }

    if !experiments_dir.is_dir() {
        anyhow::bail!("'{}' is not a directory", experiments_dir.display());
    }

    let mut experiment_files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(experiments_dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry
            .with_context(|| format!("Failed to read experiments directory: {}", experiments_dir.display()))?;
        if is_experiment_file(&entry) {
            experiment_files.push(entry.path().to_path_buf());
        }
    }

    Ok(experiment_files)
}

/// 检查条目是否为 <id>.json 文件（符号链接按目标判断）
fn is_experiment_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry.path().extension().is_some_and(|ext| ext == "json")
        && entry.path().file_stem().is_some_and(|stem| !stem.is_empty())
}
