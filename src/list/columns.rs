use crate::list::record::ListRecord;
use crate::models::{ParameterValue, ValueType};
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

/// 需要在列表中展示的参数列，按字典序返回
///
/// `only_changed` 为真时，只保留至少有两条记录取值不同的参数：
/// 每个参数以首次出现的值为基准，之后出现不相等的值即视为变化。
/// 比较失败只记录警告，不算作变化。对象类型的参数始终不展示。
///
/// 基准按 (创建时间, ID) 顺序选取，与调用方的排序无关。
pub fn params_to_display(records: &[ListRecord], only_changed: bool) -> Vec<String> {
    let mut headings: BTreeSet<String> = BTreeSet::new();

    if only_changed {
        let mut ordered: Vec<&ListRecord> = records.iter().collect();
        ordered.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));

        let mut baselines: HashMap<&str, &ParameterValue> = HashMap::new();
        for record in ordered {
            for (key, value) in displayable_params(record) {
                match baselines.get(key) {
                    Some(first) => match first.not_equal(value) {
                        Ok(true) => {
                            headings.insert(key.to_string());
                        }
                        Ok(false) => {}
                        Err(err) => warn!(param = %key, "{}", err),
                    },
                    None => {
                        baselines.insert(key, value);
                    }
                }
            }
        }
    } else {
        for record in records {
            headings.extend(displayable_params(record).map(|(key, _)| key.to_string()));
        }
    }

    headings.into_iter().collect()
}

/// 需要展示的指标列：所有最佳检查点的主指标名称，按字典序返回
pub fn metrics_to_display(records: &[ListRecord]) -> Vec<String> {
    // 目前只展示主指标
    let metrics: BTreeSet<String> = records
        .iter()
        .filter_map(|record| record.best_checkpoint.as_ref())
        .filter_map(|checkpoint| checkpoint.primary_metric.as_ref())
        .map(|metric| metric.name.clone())
        .collect();

    metrics.into_iter().collect()
}

// 对象类型的值通常很长，在列表中没有意义
fn displayable_params(record: &ListRecord) -> impl Iterator<Item = (&str, &ParameterValue)> {
    record
        .params
        .iter()
        .filter(|(_, value)| value.value_type() != ValueType::Object)
        .map(|(key, value)| (key.as_str(), value))
}
