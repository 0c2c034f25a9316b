use unicode_width::UnicodeWidthStr;

/// 简单的列对齐表格：每列宽度取该列最宽单元格，列间至少保留 `padding` 个空格
///
/// 宽度按终端显示宽度计算，中日韩字符占两列。
/// 每行最后一个单元格不参与对齐，行尾空白会被去掉。
#[derive(Debug, Default)]
pub struct TableWriter {
    rows: Vec<Vec<String>>,
    padding: usize,
}

impl TableWriter {
    pub fn new(padding: usize) -> Self {
        Self {
            rows: Vec::new(),
            padding,
        }
    }

    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let mut out = String::new();

        for row in &self.rows {
            let mut line = String::new();
            for (i, cell) in row.iter().enumerate() {
                line.push_str(cell);
                if i + 1 < row.len() {
                    let fill = widths[i] - cell.width() + self.padding;
                    line.extend(std::iter::repeat_n(' ', fill));
                }
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }

        out
    }

    // 各列宽度，不含每行最后一个单元格
    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = Vec::new();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(row.len().saturating_sub(1)) {
                if widths.len() <= i {
                    widths.resize(i + 1, 0);
                }
                widths[i] = widths[i].max(cell.width());
            }
        }
        widths
    }
}
