// list.rs - 实验列表：记录构建、字段解析、列选择与渲染
pub mod columns;
pub mod fields;
pub mod record;
pub mod render;
pub mod table;

pub use record::{ListRecord, build_records};
pub use render::{Format, render};

use crate::project::ExperimentStore;
use crate::query::{Filters, Sorter};
use anyhow::{Context, Result};
use chrono::Utc;
use std::io::Write;

/// 构建、过滤并排序记录
///
/// 先按创建时间升序作为稳定基线，再使用排序器做稳定排序。
pub fn collect_records(store: &dyn ExperimentStore, filters: &Filters, sorter: &Sorter) -> Result<Vec<ListRecord>> {
    let mut records = build_records(store, filters)?;
    records.sort_by(|a, b| sorter.compare(a, b));
    Ok(records)
}

/// 列出实验并写到标准输出
///
/// 输出先完整渲染到内存，全部成功后才写出，出错时不会留下半截报告。
pub fn list_experiments(
    store: &dyn ExperimentStore,
    format: Format,
    all_params: bool,
    filters: &Filters,
    sorter: &Sorter,
) -> Result<()> {
    let records = collect_records(store, filters, sorter)?;
    let output = render(&records, format, all_params, Utc::now())?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .and_then(|_| stdout.flush())
        .context("Failed to write experiment list")?;

    Ok(())
}
