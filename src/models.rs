// models.rs - 作为模块目录入口文件（Rust 2018+ 风格）
// 导出所有子模块
pub mod config;
pub mod models;
pub mod parameter_value;
pub mod utils;

// 重新导出常用类型，保持API一致性
pub use config::{Config, ProjectConfig};
pub use models::{Checkpoint, Experiment, MetricGoal, SHORT_ID_LENGTH};
pub use parameter_value::{ParameterValue, ValueError, ValueType, parse_value};
