// src/yaml_parser.rs
use std::path::Path;
use anyhow::{Context, Result};
use crate::models::ProjectConfig;
use tracing::debug;

/// 解析项目配置文件（replicate.yaml）
///
/// 文件不存在时返回默认配置；空文件同样视为默认配置。
pub fn parse_project_config(file_path: &Path) -> Result<ProjectConfig> {
    if !file_path.exists() {
        debug!("No project config at {}", file_path.display());
        return Ok(ProjectConfig::default());
    }

    let contents = std::fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read project config: {}", file_path.display()))?;

    if contents.trim().is_empty() {
        return Ok(ProjectConfig::default());
    }

    let config: ProjectConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse YAML from file: {}", file_path.display()))?;

    Ok(config)
}
