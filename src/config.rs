use crate::models::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// 加载工具配置；文件不存在时使用默认配置
pub fn load_config(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        debug!("No config file at {}, using defaults", config_path.display());
        return Ok(Config::default());
    }

    // 读取配置文件内容
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    // 解析TOML配置
    let config: Config = toml::from_str(&config_content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

    debug!("Loaded config from {}", config_path.display());
    Ok(config)
}
