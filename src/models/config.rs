use serde::Deserialize;

use crate::models::utils::deserialize_optional_string;

/// 应用程序配置结构（exp_list.toml）
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub heartbeat: HeartbeatConfig,
    pub list: ListConfig,
}

/// 通用配置
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub project_dir: String,
    pub project_config: String,
    /// 覆盖项目配置中的仓库地址，空字符串视为未设置
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub repository: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            project_dir: ".".to_string(),
            project_config: "replicate.yaml".to_string(),
            repository: None,
        }
    }
}

/// 心跳配置
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HeartbeatConfig {
    pub timeout_secs: u64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// 列表输出配置
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub sort: String,
    pub all_params: bool,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            sort: "started".to_string(),
            all_params: false,
        }
    }
}

/// 项目配置（replicate.yaml），同时作为实验元数据中的配置快照
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ProjectConfig {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub repository: Option<String>,
    // 旧版本使用 storage 字段
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub storage: Option<String>,
}

impl ProjectConfig {
    pub fn repository_url(&self) -> Option<&str> {
        self.repository.as_deref().or(self.storage.as_deref())
    }
}
