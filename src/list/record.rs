use crate::models::{Checkpoint, Experiment, ParameterValue, ProjectConfig};
use crate::project::ExperimentStore;
use crate::query::Filters;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// 列表视图中的一条实验记录，每次列出时临时构建
#[derive(Debug, Clone, Serialize)]
pub struct ListRecord {
    pub id: String,
    pub created: DateTime<Utc>,
    pub params: BTreeMap<String, ParameterValue>,
    pub command: String,
    pub num_checkpoints: usize,
    pub latest_checkpoint: Option<Checkpoint>,
    pub best_checkpoint: Option<Checkpoint>,
    pub user: String,
    pub host: String,
    pub running: bool,

    // 完整配置不进入JSON输出
    #[serde(skip)]
    pub config: Option<ProjectConfig>,
}

impl ListRecord {
    pub fn from_experiment(experiment: Experiment, running: bool) -> Self {
        let latest_checkpoint = experiment.latest_checkpoint().cloned();
        let best_checkpoint = experiment.best_checkpoint().cloned();
        let num_checkpoints = experiment.checkpoints.len();

        Self {
            id: experiment.id,
            created: experiment.created,
            params: experiment.params,
            command: experiment.command,
            num_checkpoints,
            latest_checkpoint,
            best_checkpoint,
            user: experiment.user,
            host: experiment.host,
            running,
            config: experiment.config,
        }
    }

    pub fn status(&self) -> &'static str {
        if self.running { "running" } else { "stopped" }
    }
}

/// 读取实验、计算运行状态与检查点、过滤，并按创建时间升序排列
///
/// 任一实验的状态查询或过滤失败都会中止整个列表。
pub fn build_records(store: &dyn ExperimentStore, filters: &Filters) -> Result<Vec<ListRecord>> {
    let mut records = Vec::new();

    for experiment in store.experiments()? {
        let running = store.experiment_is_running(&experiment.id)?;
        let record = ListRecord::from_experiment(experiment, running);

        if filters.matches(&record)? {
            records.push(record);
        }
    }

    records.sort_by(|a, b| a.created.cmp(&b.created));
    Ok(records)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::models::tests::{checkpoint, with_primary};
    use crate::models::MetricGoal;
    use chrono::TimeZone;
    use std::cell::Cell;
    use std::collections::HashSet;

    /// 内存中的实验来源
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        pub experiments: Vec<Experiment>,
        pub running: HashSet<String>,
        pub fail_running: bool,
        pub running_queries: Cell<usize>,
    }

    impl ExperimentStore for MemoryStore {
        fn experiments(&self) -> Result<Vec<Experiment>> {
            Ok(self.experiments.clone())
        }

        fn experiment_is_running(&self, experiment_id: &str) -> Result<bool> {
            self.running_queries.set(self.running_queries.get() + 1);
            if self.fail_running {
                anyhow::bail!("heartbeat unavailable for {}", experiment_id);
            }
            Ok(self.running.contains(experiment_id))
        }
    }

    pub(crate) fn experiment(id: &str, created_secs: i64, params: &[(&str, ParameterValue)]) -> Experiment {
        Experiment {
            id: id.to_string(),
            created: Utc.timestamp_opt(created_secs, 0).unwrap(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            host: "10.1.1.1".to_string(),
            user: "andreas".to_string(),
            command: "train.py".to_string(),
            config: Some(ProjectConfig::default()),
            checkpoints: Vec::new(),
        }
    }

    pub(crate) fn record(id: &str, created_secs: i64, params: &[(&str, ParameterValue)]) -> ListRecord {
        ListRecord::from_experiment(experiment(id, created_secs, params), false)
    }

    #[test]
    fn test_from_experiment() {
        let mut exp = experiment("1eeeeeeeee", 100, &[("lr", ParameterValue::float(0.1))]);
        exp.checkpoints = vec![
            with_primary(checkpoint("a", 1, &[("loss", ParameterValue::float(0.1))]), "loss", MetricGoal::Minimize),
            with_primary(checkpoint("b", 2, &[("loss", ParameterValue::float(0.3))]), "loss", MetricGoal::Minimize),
        ];

        let record = ListRecord::from_experiment(exp, true);
        assert_eq!(record.num_checkpoints, 2);
        assert_eq!(record.latest_checkpoint.as_ref().unwrap().id, "b");
        assert_eq!(record.best_checkpoint.as_ref().unwrap().id, "a");
        assert_eq!(record.status(), "running");
        assert!(record.config.is_some());
    }

    #[test]
    fn test_build_records_sorts_by_created() {
        let mut store = MemoryStore::default();
        store.experiments = vec![
            experiment("c", 300, &[]),
            experiment("a", 100, &[]),
            experiment("b", 200, &[]),
        ];
        store.running.insert("b".to_string());

        let records = build_records(&store, &Filters::default()).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(records[1].running);
        assert!(!records[0].running);
    }

    #[test]
    fn test_build_records_applies_filters() {
        let mut store = MemoryStore::default();
        store.experiments = vec![
            experiment("a", 100, &[("lr", ParameterValue::float(0.1))]),
            experiment("b", 200, &[("lr", ParameterValue::float(0.2))]),
            experiment("c", 300, &[]),
        ];

        let filters = Filters::parse(&["lr>0.15".to_string()]).unwrap();
        let records = build_records(&store, &filters).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn test_build_records_running_failure_is_fatal() {
        let mut store = MemoryStore::default();
        store.experiments = vec![experiment("a", 100, &[]), experiment("b", 200, &[])];
        store.fail_running = true;

        let err = build_records(&store, &Filters::default()).unwrap_err();
        assert!(err.to_string().contains("heartbeat unavailable for a"));
        // 第一个失败后立即中止
        assert_eq!(store.running_queries.get(), 1);
    }

    #[test]
    fn test_build_records_filter_failure_is_fatal() {
        let mut store = MemoryStore::default();
        store.experiments = vec![experiment("a", 100, &[("lr", ParameterValue::float(0.1))])];

        let filters = Filters::parse(&["lr=fast".to_string()]).unwrap();
        assert!(build_records(&store, &filters).is_err());
    }
}
