use crate::list::columns::{metrics_to_display, params_to_display};
use crate::list::record::ListRecord;
use crate::list::table::TableWriter;
use crate::models::{Checkpoint, ParameterValue, SHORT_ID_LENGTH};
use crate::time_format::format_relative;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

const VALUE_MAX_LENGTH: usize = 20;
const VALUE_TRUNCATE: usize = 5;
const COLUMN_PADDING: usize = 2;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Table,
    Quiet,
}

/// 将记录渲染为完整输出文本，调用方在成功后一次性写出
pub fn render(records: &[ListRecord], format: Format, all_params: bool, now: DateTime<Utc>) -> Result<String> {
    match format {
        Format::Json => render_json(records),
        Format::Table => Ok(render_table(records, all_params, now)),
        Format::Quiet => Ok(render_quiet(records)),
    }
}

fn render_quiet(records: &[ListRecord]) -> String {
    records.iter().map(|record| format!("{}\n", record.id)).collect()
}

fn render_json(records: &[ListRecord]) -> Result<String> {
    let mut out = serde_json::to_string_pretty(records).context("Failed to serialize experiments")?;
    out.push('\n');
    Ok(out)
}

// 输出示例：
// EXPERIMENT  STARTED         STATUS   HOST      USER     LR   LATEST CHECKPOINT  LOSS  BEST CHECKPOINT    LOSS
// 1eeeeee     10 seconds ago  running  10.1.1.1  andreas  0.1  3cccccc (step 20)  0.02  2cccccc (step 10)  0.01
fn render_table(records: &[ListRecord], all_params: bool, now: DateTime<Utc>) -> String {
    if records.is_empty() {
        return "No experiments found\n".to_string();
    }

    let mut table = TableWriter::new(COLUMN_PADDING);
    for row in table_rows(records, all_params, now) {
        table.push_row(row);
    }
    table.render()
}

// 表头与每条记录的单元格；各行单元格数量一致
fn table_rows(records: &[ListRecord], all_params: bool, now: DateTime<Utc>) -> Vec<Vec<String>> {
    let params = params_to_display(records, !all_params);
    let metrics = metrics_to_display(records);
    let has_best_checkpoint = records.iter().any(|record| record.best_checkpoint.is_some());

    let mut header: Vec<String> = ["EXPERIMENT", "STARTED", "STATUS", "HOST", "USER"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(upper(&params));
    header.push("LATEST CHECKPOINT".to_string());
    header.extend(upper(&metrics));
    if has_best_checkpoint {
        header.push("BEST CHECKPOINT".to_string());
        header.extend(upper(&metrics));
    }

    let mut rows = vec![header];
    for record in records {
        let mut row = vec![
            record.id.chars().take(SHORT_ID_LENGTH).collect::<String>(),
            format_relative(record.created, now),
            record.status().to_string(),
            record.host.clone(),
            record.user.clone(),
        ];

        for heading in &params {
            row.push(record.params.get(heading).map(short_value).unwrap_or_default());
        }

        push_checkpoint_cells(&mut row, record.latest_checkpoint.as_ref(), &metrics);
        if has_best_checkpoint {
            push_checkpoint_cells(&mut row, record.best_checkpoint.as_ref(), &metrics);
        }

        rows.push(row);
    }

    rows
}

// 检查点单元格 "<短ID> (step <N>)" 及其各指标的取值
fn push_checkpoint_cells(row: &mut Vec<String>, checkpoint: Option<&Checkpoint>, metrics: &[String]) {
    row.push(
        checkpoint
            .map(|cp| format!("{} (step {})", cp.short_id(), cp.step))
            .unwrap_or_default(),
    );

    for heading in metrics {
        row.push(
            checkpoint
                .and_then(|cp| cp.metrics.get(heading))
                .map(short_value)
                .unwrap_or_default(),
        );
    }
}

fn short_value(value: &ParameterValue) -> String {
    value.short_string(VALUE_MAX_LENGTH, VALUE_TRUNCATE)
}

fn upper(names: &[String]) -> impl Iterator<Item = String> + '_ {
    names.iter().map(|name| name.to_uppercase())
}
