// src/query.rs
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;
use crate::list::fields::resolve;
use crate::list::record::ListRecord;
use crate::models::{ParameterValue, ValueError, parse_value};

const DESCENDING_SUFFIX: &str = "-desc";

/// 过滤与排序表达式错误
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid filter '{0}': expected <name> <operator> <value>, e.g. \"step>=100\"")]
    InvalidFilter(String),
    #[error("invalid sort key '{0}'")]
    InvalidSortKey(String),
    #[error("failed to evaluate filter '{filter}': {source}")]
    Comparison {
        filter: String,
        #[source]
        source: ValueError,
    },
}

/// 比较运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

impl Operator {
    // 按长度从长到短排列，保证 "<=" 先于 "<" 匹配
    const SYMBOLS: [(&'static str, Operator); 6] = [
        ("!=", Operator::NotEqual),
        ("<=", Operator::LessOrEqual),
        (">=", Operator::GreaterOrEqual),
        ("=", Operator::Equal),
        ("<", Operator::LessThan),
        (">", Operator::GreaterThan),
    ];

    fn symbol(self) -> &'static str {
        Self::SYMBOLS
            .iter()
            .find(|(_, op)| *op == self)
            .map_or("=", |(symbol, _)| *symbol)
    }
}

/// 单个过滤条件，例如 "status = running"
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub name: String,
    pub operator: Operator,
    pub value: ParameterValue,
}

impl Filter {
    pub fn parse(expression: &str) -> Result<Self, QueryError> {
        let invalid = || QueryError::InvalidFilter(expression.to_string());

        let start = expression.find(['=', '!', '<', '>']).ok_or_else(invalid)?;
        let rest = &expression[start..];
        let (symbol, operator) = Operator::SYMBOLS
            .iter()
            .find(|(symbol, _)| rest.starts_with(symbol))
            .ok_or_else(invalid)?;

        let name = expression[..start].trim();
        let value = rest[symbol.len()..].trim();
        if name.is_empty() || value.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            name: name.to_string(),
            operator: *operator,
            value: parse_value(value),
        })
    }

    /// 字段不存在时不匹配；类型无法比较时返回错误
    pub fn matches(&self, record: &ListRecord) -> Result<bool, QueryError> {
        let Some(actual) = resolve(record, &self.name) else {
            return Ok(false);
        };

        let expected = &self.value;
        let result = match self.operator {
            Operator::Equal => actual.equals(expected),
            Operator::NotEqual => actual.not_equal(expected),
            Operator::LessThan => actual.less_than(expected),
            Operator::LessOrEqual => expected.less_than(&actual).map(|greater| !greater),
            Operator::GreaterThan => expected.less_than(&actual),
            Operator::GreaterOrEqual => actual.less_than(expected).map(|less| !less),
        };

        result.map_err(|source| QueryError::Comparison {
            filter: self.to_string(),
            source,
        })
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.operator.symbol(), self.value)
    }
}

/// 一组过滤条件，全部满足才算匹配
#[derive(Debug, Clone, Default)]
pub struct Filters {
    filters: Vec<Filter>,
}

impl Filters {
    pub fn parse(expressions: &[String]) -> Result<Self, QueryError> {
        let filters = expressions
            .iter()
            .map(|expression| Filter::parse(expression))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { filters })
    }

    pub fn matches(&self, record: &ListRecord) -> Result<bool, QueryError> {
        for filter in &self.filters {
            if !filter.matches(record)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// 按单个字段排序，"<name>-desc" 表示降序
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sorter {
    key: String,
    descending: bool,
}

impl Sorter {
    pub fn parse(expression: &str) -> Result<Self, QueryError> {
        let expression = expression.trim();
        let (key, descending) = match expression.strip_suffix(DESCENDING_SUFFIX) {
            Some(key) => (key, true),
            None => (expression, false),
        };

        if key.is_empty() {
            return Err(QueryError::InvalidSortKey(expression.to_string()));
        }

        Ok(Self {
            key: key.to_string(),
            descending,
        })
    }

    /// 全序比较：缺少该字段的记录排在最后；无法比较的值按类型排序
    pub fn compare(&self, a: &ListRecord, b: &ListRecord) -> Ordering {
        match (resolve(a, &self.key), resolve(b, &self.key)) {
            (Some(x), Some(y)) => {
                let ordering = x
                    .compare(&y)
                    .unwrap_or_else(|_| x.value_type().cmp(&y.value_type()));
                if self.descending { ordering.reverse() } else { ordering }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl Default for Sorter {
    fn default() -> Self {
        Self {
            key: "started".to_string(),
            descending: false,
        }
    }
}
