use crate::models::config::ProjectConfig;
use crate::models::parameter_value::ParameterValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// 短ID长度，实验与检查点共用
pub const SHORT_ID_LENGTH: usize = 7;

/// 主指标的优化方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricGoal {
    Maximize,
    Minimize,
}

/// 主指标：用于挑选最佳检查点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryMetric {
    pub name: String,
    pub goal: MetricGoal,
}

/// 检查点，训练过程中的一次保存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: String,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub metrics: BTreeMap<String, ParameterValue>,
    #[serde(default)]
    pub step: i64,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub primary_metric: Option<PrimaryMetric>,
}

impl Checkpoint {
    pub fn short_id(&self) -> String {
        self.id.chars().take(SHORT_ID_LENGTH).collect()
    }

    /// 该检查点上主指标的取值（若声明了主指标且存在对应值）
    pub fn primary_metric_value(&self) -> Option<&ParameterValue> {
        self.primary_metric
            .as_ref()
            .and_then(|metric| self.metrics.get(&metric.name))
    }
}

/// 实验数据结构，对应仓库中的一条实验元数据
#[derive(Debug, Clone, Deserialize)]
pub struct Experiment {
    pub id: String,
    pub created: DateTime<Utc>,
    // ————————————————————————————————————————————————————————————————————————
    // 用户参数集合，键为参数名，值为参数值
    // ————————————————————————————————————————————————————————————————————————
    #[serde(default)]
    pub params: BTreeMap<String, ParameterValue>,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub config: Option<ProjectConfig>,
    #[serde(default)]
    pub checkpoints: Vec<Checkpoint>,
}

impl Experiment {
    /// 步数最大的检查点；步数相同时取列表中靠后的一个
    pub fn latest_checkpoint(&self) -> Option<&Checkpoint> {
        self.checkpoints
            .iter()
            .fold(None, |latest: Option<&Checkpoint>, checkpoint| match latest {
                Some(current) if current.step > checkpoint.step => Some(current),
                _ => Some(checkpoint),
            })
    }

    /// 主指标最优的检查点，方向由主指标的 goal 决定
    pub fn best_checkpoint(&self) -> Option<&Checkpoint> {
        let mut best: Option<(&Checkpoint, &ParameterValue)> = None;

        for checkpoint in &self.checkpoints {
            let (Some(metric), Some(value)) =
                (&checkpoint.primary_metric, checkpoint.primary_metric_value())
            else {
                continue;
            };

            // 训练发散时指标可能为 NaN，不参与排名
            if value.is_nan() {
                warn!(
                    experiment = %self.id,
                    checkpoint = %checkpoint.id,
                    "skipping checkpoint with NaN {}",
                    metric.name
                );
                continue;
            }

            let Some((_, best_value)) = best else {
                best = Some((checkpoint, value));
                continue;
            };

            let better = match metric.goal {
                MetricGoal::Maximize => best_value.less_than(value),
                MetricGoal::Minimize => value.less_than(best_value),
            };
            match better {
                Ok(true) => best = Some((checkpoint, value)),
                Ok(false) => {}
                Err(err) => warn!(
                    experiment = %self.id,
                    checkpoint = %checkpoint.id,
                    "skipping checkpoint when ranking {}: {}",
                    metric.name,
                    err
                ),
            }
        }

        best.map(|(checkpoint, _)| checkpoint)
    }
}
