use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// 参数值的类型标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueType {
    Int,
    Float,
    String,
    Bool,
    Object, // 列表与映射统一视为对象
    None,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::Bool => "bool",
            ValueType::Object => "object",
            ValueType::None => "None",
        };
        f.write_str(name)
    }
}

/// 参数值比较错误
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    #[error("can't compare {left} value {left_value} with {right} value {right_value}")]
    Incomparable {
        left: ValueType,
        left_value: String,
        right: ValueType,
        right_value: String,
    },
}

/// 参数值类型枚举，支持递归结构
#[derive(Clone, PartialEq)]
pub enum ParameterValue {
    // ————————————————————————————————————————————————————————————————————————
    // 基本参数值类型，包含字符串、数字、布尔值等基本类型
    // ————————————————————————————————————————————————————————————————————————
    Basic(BasicParameterValue),
    // ————————————————————————————————————————————————————————————————————————
    // 参数值列表类型，支持嵌套的参数值数组
    // ————————————————————————————————————————————————————————————————————————
    List(Vec<ParameterValue>),
    // ————————————————————————————————————————————————————————————————————————
    // 结构化映射，键按字典序保存以保证输出稳定
    // ————————————————————————————————————————————————————————————————————————
    Map(BTreeMap<String, ParameterValue>),
    None, // 显式的空值（JSON null）
}

/// 基本参数值类型，只包含标量
#[derive(Clone, PartialEq)]
pub enum BasicParameterValue {
    String(String), // 字符串类型参数值
    Float(f64),     // 浮点数类型参数值
    Int(i64),       // 整数类型参数值
    Bool(bool),     // 布尔类型参数值
}

/// 为BasicParameterValue实现Debug trait，使用Display的格式
impl fmt::Debug for BasicParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl BasicParameterValue {
    pub fn to_string_repr(&self) -> String {
        match self {
            BasicParameterValue::String(s) => s.clone(),
            BasicParameterValue::Float(n) => n.to_string(),
            BasicParameterValue::Int(n) => n.to_string(),
            BasicParameterValue::Bool(b) => b.to_string(),
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            BasicParameterValue::String(_) => ValueType::String,
            BasicParameterValue::Float(_) => ValueType::Float,
            BasicParameterValue::Int(_) => ValueType::Int,
            BasicParameterValue::Bool(_) => ValueType::Bool,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            BasicParameterValue::Float(n) => Some(*n),
            BasicParameterValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }
}

/// 为BasicParameterValue实现Display trait，支持format!("{}", value)语法
impl fmt::Display for BasicParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_repr())
    }
}

impl ParameterValue {
    pub fn int(value: i64) -> Self {
        ParameterValue::Basic(BasicParameterValue::Int(value))
    }

    pub fn float(value: f64) -> Self {
        ParameterValue::Basic(BasicParameterValue::Float(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        ParameterValue::Basic(BasicParameterValue::String(value.into()))
    }

    pub fn bool(value: bool) -> Self {
        ParameterValue::Basic(BasicParameterValue::Bool(value))
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            ParameterValue::Basic(basic) => basic.value_type(),
            ParameterValue::List(_) | ParameterValue::Map(_) => ValueType::Object,
            ParameterValue::None => ValueType::None,
        }
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, ParameterValue::Basic(BasicParameterValue::Float(x)) if x.is_nan())
    }

    /// 判断两个值是否相等；整数与浮点数按数值比较，其余类型不一致时返回错误
    pub fn equals(&self, other: &Self) -> Result<bool, ValueError> {
        use BasicParameterValue as B;

        match (self, other) {
            (ParameterValue::None, ParameterValue::None) => Ok(true),
            (ParameterValue::None, _) | (_, ParameterValue::None) => Ok(false),
            (ParameterValue::Basic(a), ParameterValue::Basic(b)) => match (a, b) {
                (B::Int(x), B::Int(y)) => Ok(x == y),
                (B::String(x), B::String(y)) => Ok(x == y),
                (B::Bool(x), B::Bool(y)) => Ok(x == y),
                _ => match (a.as_f64(), b.as_f64()) {
                    (Some(x), Some(y)) => Ok(x == y),
                    _ => Err(self.incomparable(other)),
                },
            },
            (
                ParameterValue::List(_) | ParameterValue::Map(_),
                ParameterValue::List(_) | ParameterValue::Map(_),
            ) => Ok(self == other),
            _ => Err(self.incomparable(other)),
        }
    }

    pub fn not_equal(&self, other: &Self) -> Result<bool, ValueError> {
        self.equals(other).map(|eq| !eq)
    }

    /// 全序比较，供过滤与排序使用。NaN 大于所有数字。
    pub fn compare(&self, other: &Self) -> Result<Ordering, ValueError> {
        use BasicParameterValue as B;

        match (self, other) {
            (ParameterValue::Basic(a), ParameterValue::Basic(b)) => match (a, b) {
                (B::Int(x), B::Int(y)) => Ok(x.cmp(y)),
                (B::String(x), B::String(y)) => Ok(x.cmp(y)),
                (B::Bool(x), B::Bool(y)) => Ok(x.cmp(y)),
                _ => match (a.as_f64(), b.as_f64()) {
                    (Some(x), Some(y)) => Ok(x.total_cmp(&y)),
                    _ => Err(self.incomparable(other)),
                },
            },
            _ => Err(self.incomparable(other)),
        }
    }

    pub fn less_than(&self, other: &Self) -> Result<bool, ValueError> {
        self.compare(other).map(|ordering| ordering == Ordering::Less)
    }

    /// 截断显示：超过 max_length 个字符时保留前 truncate 个字符并追加 "..."
    pub fn short_string(&self, max_length: usize, truncate: usize) -> String {
        let s = self.to_string();
        if s.chars().count() > max_length {
            let head: String = s.chars().take(truncate).collect();
            format!("{}...", head)
        } else {
            s
        }
    }

    fn incomparable(&self, other: &Self) -> ValueError {
        ValueError::Incomparable {
            left: self.value_type(),
            left_value: self.to_string(),
            right: other.value_type(),
            right_value: other.to_string(),
        }
    }
}

/// 为ParameterValue实现Debug trait，使用Display的格式
impl fmt::Debug for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Basic(basic_value) => write!(f, "{}", basic_value),
            ParameterValue::None => f.write_str("None"),
            // 对象以紧凑JSON形式展示
            ParameterValue::List(_) | ParameterValue::Map(_) => {
                write!(f, "{}", JsonValue::from(self))
            }
        }
    }
}

impl From<&BasicParameterValue> for JsonValue {
    fn from(val: &BasicParameterValue) -> Self {
        match val {
            BasicParameterValue::String(s) => JsonValue::String(s.clone()),
            BasicParameterValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            BasicParameterValue::Int(i) => JsonValue::Number((*i).into()),
            BasicParameterValue::Bool(b) => JsonValue::Bool(*b),
        }
    }
}

impl From<&ParameterValue> for JsonValue {
    fn from(val: &ParameterValue) -> Self {
        match val {
            ParameterValue::Basic(basic) => basic.into(),
            ParameterValue::List(list) => {
                JsonValue::Array(list.iter().map(|item| item.into()).collect())
            }
            ParameterValue::Map(map) => JsonValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.into()))
                    .collect::<serde_json::Map<_, _>>(),
            ),
            ParameterValue::None => JsonValue::Null,
        }
    }
}

impl From<JsonValue> for ParameterValue {
    fn from(val: JsonValue) -> Self {
        match val {
            JsonValue::Null => ParameterValue::None,
            JsonValue::Bool(b) => ParameterValue::bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => ParameterValue::int(i),
                None => ParameterValue::float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => ParameterValue::string(s),
            JsonValue::Array(items) => {
                ParameterValue::List(items.into_iter().map(ParameterValue::from).collect())
            }
            JsonValue::Object(map) => ParameterValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, ParameterValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for ParameterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        JsonValue::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ParameterValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        JsonValue::deserialize(deserializer).map(ParameterValue::from)
    }
}

/// 将命令行中的字面量解析为参数值
///
/// 依次尝试整数、浮点数、布尔值、None/null 和 JSON 对象或数组，都不匹配时作为字符串。
pub fn parse_value(s: &str) -> ParameterValue {
    if let Ok(i) = s.parse::<i64>() {
        return ParameterValue::int(i);
    }
    // "inf"、"nan" 之类的单词不当作数字
    if s.chars().any(|c| c.is_ascii_digit()) {
        if let Ok(f) = s.parse::<f64>() {
            return ParameterValue::float(f);
        }
    }
    match s {
        "true" | "True" => return ParameterValue::bool(true),
        "false" | "False" => return ParameterValue::bool(false),
        "None" | "null" => return ParameterValue::None,
        _ => {}
    }
    if s.starts_with('{') || s.starts_with('[') {
        if let Ok(json) = serde_json::from_str::<JsonValue>(s) {
            return ParameterValue::from(json);
        }
    }
    ParameterValue::string(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_parameter_value_display() {
        let string_value = BasicParameterValue::String("test_string".to_string());
        assert_eq!(format!("{}", string_value), "test_string");

        let float_value = BasicParameterValue::Float(0.1);
        assert_eq!(format!("{}", float_value), "0.1");

        let whole_float = BasicParameterValue::Float(2.0);
        assert_eq!(format!("{}", whole_float), "2");

        let int_value = BasicParameterValue::Int(42);
        assert_eq!(format!("{}", int_value), "42");

        let bool_value = BasicParameterValue::Bool(true);
        assert_eq!(format!("{}", bool_value), "true");
    }

    #[test]
    fn test_object_display_is_compact_json() {
        let list = ParameterValue::List(vec![
            ParameterValue::int(1),
            ParameterValue::string("two"),
            ParameterValue::float(3.5),
        ]);
        assert_eq!(format!("{}", list), r#"[1,"two",3.5]"#);

        let mut map = BTreeMap::new();
        map.insert("b".to_string(), ParameterValue::bool(false));
        map.insert("a".to_string(), ParameterValue::None);
        assert_eq!(format!("{}", ParameterValue::Map(map)), r#"{"a":null,"b":false}"#);
    }

    #[test]
    fn test_debug_equals_display() {
        // 测试 Debug 和 Display 的输出是否相同
        let basic_value = ParameterValue::string("hello");
        assert_eq!(format!("{:?}", basic_value), format!("{}", basic_value));

        let none_value = ParameterValue::None;
        assert_eq!(format!("{:?}", none_value), "None");
    }

    #[test]
    fn test_value_type() {
        assert_eq!(ParameterValue::int(1).value_type(), ValueType::Int);
        assert_eq!(ParameterValue::float(1.0).value_type(), ValueType::Float);
        assert_eq!(ParameterValue::string("x").value_type(), ValueType::String);
        assert_eq!(ParameterValue::bool(true).value_type(), ValueType::Bool);
        assert_eq!(ParameterValue::List(vec![]).value_type(), ValueType::Object);
        assert_eq!(ParameterValue::Map(BTreeMap::new()).value_type(), ValueType::Object);
        assert_eq!(ParameterValue::None.value_type(), ValueType::None);
    }

    #[test]
    fn test_is_nan() {
        assert!(ParameterValue::float(f64::NAN).is_nan());
        assert!(!ParameterValue::float(0.5).is_nan());
        assert!(!ParameterValue::string("NaN").is_nan());
        assert!(!ParameterValue::None.is_nan());
    }

    #[test]
    fn test_not_equal_same_type() {
        assert_eq!(ParameterValue::float(0.1).not_equal(&ParameterValue::float(0.1)), Ok(false));
        assert_eq!(ParameterValue::float(0.1).not_equal(&ParameterValue::float(0.2)), Ok(true));
        assert_eq!(ParameterValue::string("a").not_equal(&ParameterValue::string("b")), Ok(true));
        assert_eq!(ParameterValue::bool(true).not_equal(&ParameterValue::bool(true)), Ok(false));
    }

    #[test]
    fn test_not_equal_mixed_numbers() {
        assert_eq!(ParameterValue::int(2).not_equal(&ParameterValue::float(2.0)), Ok(false));
        assert_eq!(ParameterValue::int(2).not_equal(&ParameterValue::float(2.5)), Ok(true));
    }

    #[test]
    fn test_not_equal_incomparable() {
        let err = ParameterValue::int(1)
            .not_equal(&ParameterValue::string("1"))
            .unwrap_err();
        assert_eq!(
            err,
            ValueError::Incomparable {
                left: ValueType::Int,
                left_value: "1".to_string(),
                right: ValueType::String,
                right_value: "1".to_string(),
            }
        );
        assert!(err.to_string().contains("can't compare int"));
    }

    #[test]
    fn test_none_is_only_equal_to_none() {
        assert_eq!(ParameterValue::None.not_equal(&ParameterValue::None), Ok(false));
        assert_eq!(ParameterValue::None.not_equal(&ParameterValue::int(0)), Ok(true));
        assert_eq!(ParameterValue::string("x").not_equal(&ParameterValue::None), Ok(true));
    }

    #[test]
    fn test_compare() {
        assert_eq!(ParameterValue::int(1).compare(&ParameterValue::float(1.5)), Ok(Ordering::Less));
        assert_eq!(ParameterValue::string("b").compare(&ParameterValue::string("a")), Ok(Ordering::Greater));
        assert_eq!(ParameterValue::bool(false).less_than(&ParameterValue::bool(true)), Ok(true));
        assert_eq!(ParameterValue::float(f64::NAN).less_than(&ParameterValue::float(1e300)), Ok(false));
        assert!(ParameterValue::List(vec![]).compare(&ParameterValue::List(vec![])).is_err());
        assert!(ParameterValue::string("a").less_than(&ParameterValue::int(1)).is_err());
    }

    #[test]
    fn test_short_string() {
        let long = ParameterValue::string("this-is-a-very-long-value-12345");
        assert_eq!(long.short_string(20, 5), "this-...");

        let exact = ParameterValue::string("a".repeat(20));
        assert_eq!(exact.short_string(20, 5), "a".repeat(20));

        let unicode = ParameterValue::string("学习率调度器配置参数名称非常非常长的一个字符串");
        assert_eq!(unicode.short_string(20, 5), "学习率调度...");

        assert_eq!(ParameterValue::float(0.001).short_string(20, 5), "0.001");
    }

    #[test]
    fn test_json_round_trip_preserves_types() {
        let json = r#"{"lr": 0.01, "epochs": 10, "name": "resnet", "pretrained": true, "layers": [1, 2], "extra": null}"#;
        let params: BTreeMap<String, ParameterValue> = serde_json::from_str(json).unwrap();

        assert_eq!(params["lr"], ParameterValue::float(0.01));
        assert_eq!(params["epochs"], ParameterValue::int(10));
        assert_eq!(params["name"], ParameterValue::string("resnet"));
        assert_eq!(params["pretrained"], ParameterValue::bool(true));
        assert_eq!(params["layers"].value_type(), ValueType::Object);
        assert_eq!(params["extra"], ParameterValue::None);

        let out = serde_json::to_string(&params["layers"]).unwrap();
        assert_eq!(out, "[1,2]");
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("10"), ParameterValue::int(10));
        assert_eq!(parse_value("0.5"), ParameterValue::float(0.5));
        assert_eq!(parse_value("1e-3"), ParameterValue::float(0.001));
        assert_eq!(parse_value("true"), ParameterValue::bool(true));
        assert_eq!(parse_value("False"), ParameterValue::bool(false));
        assert_eq!(parse_value("None"), ParameterValue::None);
        assert_eq!(parse_value("running"), ParameterValue::string("running"));
        assert_eq!(parse_value("nan"), ParameterValue::string("nan"));
        assert_eq!(parse_value("[1, 2]").value_type(), ValueType::Object);
        assert_eq!(parse_value("{broken"), ParameterValue::string("{broken"));
    }
}
