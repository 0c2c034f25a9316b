// src/project.rs
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::debug;
use crate::file_utils::{experiments_dir, find_experiment_files, heartbeat_file};
use crate::models::{Config, Experiment};
use crate::yaml_parser::parse_project_config;

/// 未配置仓库时的默认位置（相对项目目录）
const DEFAULT_REPOSITORY: &str = ".replicate";
const FILE_SCHEME: &str = "file://";

/// 实验数据来源
pub trait ExperimentStore {
    /// 读取全部实验
    fn experiments(&self) -> Result<Vec<Experiment>>;
    /// 实验进程是否仍在运行
    fn experiment_is_running(&self, experiment_id: &str) -> Result<bool>;
}

/// 心跳文件内容
#[derive(Debug, Deserialize)]
struct Heartbeat {
    last_heartbeat: DateTime<Utc>,
}

/// 基于本地文件仓库的项目
#[derive(Debug)]
pub struct Project {
    repository_dir: PathBuf,
    heartbeat_timeout: Duration,
}

impl Project {
    pub fn new(repository_dir: impl Into<PathBuf>, heartbeat_timeout: Duration) -> Self {
        Self {
            repository_dir: repository_dir.into(),
            heartbeat_timeout,
        }
    }

    /// 根据工具配置与项目配置定位仓库
    pub fn open(config: &Config, project_dir: Option<&Path>) -> Result<Self> {
        let project_dir = project_dir.unwrap_or_else(|| Path::new(&config.general.project_dir));
        let project_config = parse_project_config(&project_dir.join(&config.general.project_config))?;

        let repository = config
            .general
            .repository
            .as_deref()
            .or(project_config.repository_url())
            .unwrap_or(DEFAULT_REPOSITORY);
        let repository_dir = resolve_repository_dir(project_dir, repository)?;
        debug!("Using repository {}", repository_dir.display());

        let heartbeat_timeout = i64::try_from(config.heartbeat.timeout_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .context("Heartbeat timeout is too large")?;
        Ok(Self::new(repository_dir, heartbeat_timeout))
    }

    pub fn repository_dir(&self) -> &Path {
        &self.repository_dir
    }

    fn load_experiment(path: &Path) -> Result<Experiment> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read experiment metadata: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse experiment metadata: {}", path.display()))
    }
}

impl ExperimentStore for Project {
    fn experiments(&self) -> Result<Vec<Experiment>> {
        let files = find_experiment_files(&experiments_dir(&self.repository_dir))?;
        debug!("Found {} experiment files", files.len());

        files.iter().map(|path| Self::load_experiment(path)).collect()
    }

    fn experiment_is_running(&self, experiment_id: &str) -> Result<bool> {
        let path = heartbeat_file(&self.repository_dir, experiment_id)?;
        if !path.exists() {
            return Ok(false);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read heartbeat: {}", path.display()))?;
        let heartbeat: Heartbeat = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse heartbeat: {}", path.display()))?;

        Ok(heartbeat_is_alive(heartbeat.last_heartbeat, Utc::now(), self.heartbeat_timeout))
    }
}

/// 最近一次心跳距今未超过超时时间即视为运行中
fn heartbeat_is_alive(last_heartbeat: DateTime<Utc>, now: DateTime<Utc>, timeout: Duration) -> bool {
    now.signed_duration_since(last_heartbeat) < timeout
}

/// 将仓库地址解析为本地目录；仅支持 file:// 和裸路径
fn resolve_repository_dir(project_dir: &Path, repository: &str) -> Result<PathBuf> {
    let path = match repository.strip_prefix(FILE_SCHEME) {
        Some(path) => path,
        None if repository.contains("://") => anyhow::bail!(
            "Unsupported repository '{}': only local file:// repositories can be listed",
            repository
        ),
        None => repository,
    };

    let path = Path::new(path);
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(project_dir.join(path))
    }
}
