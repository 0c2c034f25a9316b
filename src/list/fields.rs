use crate::list::record::ListRecord;
use crate::models::ParameterValue;

/// 由记录其他属性计算得到的虚拟字段
pub struct VirtualField {
    pub name: &'static str,
    resolve: fn(&ListRecord) -> ParameterValue,
}

/// 虚拟字段按此顺序优先匹配，同名的指标与用户参数会被遮蔽
pub const VIRTUAL_FIELDS: &[VirtualField] = &[
    VirtualField { name: "started", resolve: started },
    VirtualField { name: "step", resolve: step },
    VirtualField { name: "user", resolve: user },
    VirtualField { name: "host", resolve: host },
    VirtualField { name: "command", resolve: command },
    VirtualField { name: "status", resolve: status },
];

/// 按字段名解析记录中的值
///
/// 查找顺序：虚拟字段 → 最佳检查点的指标 → 用户参数。
pub fn resolve(record: &ListRecord, name: &str) -> Option<ParameterValue> {
    if let Some(field) = VIRTUAL_FIELDS.iter().find(|field| field.name == name) {
        return Some((field.resolve)(record));
    }

    if let Some(value) = record
        .best_checkpoint
        .as_ref()
        .and_then(|checkpoint| checkpoint.metrics.get(name))
    {
        return Some(value.clone());
    }

    record.params.get(name).cloned()
}

// 创建时间，秒（含小数），用于数值比较
fn started(record: &ListRecord) -> ParameterValue {
    ParameterValue::float(record.created.timestamp_micros() as f64 / 1_000_000.0)
}

fn step(record: &ListRecord) -> ParameterValue {
    ParameterValue::int(
        record
            .latest_checkpoint
            .as_ref()
            .map_or(0, |checkpoint| checkpoint.step),
    )
}

fn user(record: &ListRecord) -> ParameterValue {
    ParameterValue::string(record.user.as_str())
}

fn host(record: &ListRecord) -> ParameterValue {
    ParameterValue::string(record.host.as_str())
}

fn command(record: &ListRecord) -> ParameterValue {
    ParameterValue::string(record.command.as_str())
}

fn status(record: &ListRecord) -> ParameterValue {
    ParameterValue::string(record.status())
}
