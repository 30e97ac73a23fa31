use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalysisError;
use crate::utils::{format_js_number, js_number};

/// Bin label and mode used when a column has no clean values.
pub const NO_DATA: &str = "No Data";

// ============================================================================
// Cell Values and Rows
// ============================================================================

/// A single table cell.
///
/// Loaders decide the variant once, at ingestion time. A key that is absent
/// from a [`Row`] reads as [`Value::Null`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Number(f64),
    Text(String),
    #[default]
    Null,
}

static NULL_VALUE: Value = Value::Null;

/// Largest integer an `f64` holds exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether the value is excluded from analysis.
    ///
    /// Null is always missing; the empty string only when `exclude_empty` is set.
    pub fn is_missing(&self, exclude_empty: bool) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => exclude_empty && s.is_empty(),
            Value::Number(_) => false,
        }
    }

    /// The value as a number, without coercing text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Loose numeric coercion: text is parsed as a number literal, null is
    /// `0`, and anything unparseable is `NaN`.
    pub fn coerce_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Text(s) => js_number(s),
            Value::Null => 0.0,
        }
    }

    /// Coercion used for type classification: `Some` only when the value
    /// converts to a finite number.
    pub fn finite_number(&self) -> Option<f64> {
        match self {
            Value::Null => None,
            other => Some(other.coerce_number()).filter(|n| n.is_finite()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_js_number(*n)),
            Value::Text(s) => f.write_str(s),
            Value::Null => f.write_str("null"),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Whole numbers print without a fraction, like `JSON.stringify`
            Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Null => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number, string, boolean or null")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
                Ok(Value::Text(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
                Ok(Value::Number(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
                Ok(Value::Number(v as f64))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
                Ok(Value::Number(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
                Ok(Value::Text(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
                Ok(Value::Text(v))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Value, D::Error> {
                Value::deserialize(d)
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

/// One table row: column name to value, in insertion order.
///
/// Rows of the same table need not share keys; a missing key reads as null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly useful for constructing fixtures.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// The cell for `column`, or `None` when the key is absent.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(key, _)| key == column)
            .map(|(_, value)| value)
    }

    /// The cell for `column`, reading an absent key as null.
    pub fn value(&self, column: &str) -> &Value {
        self.get(column).unwrap_or(&NULL_VALUE)
    }

    /// Replace the value for `column`, appending the key if it is new.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(key, _)| *key == column) {
            Some((_, slot)) => *slot = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (key, value) in iter {
            row.set(key, value);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (key, value) in &self.cells {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping column names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Row, A::Error> {
                let mut row = Row::new();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    row.set(key, value);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// Column names of a table, taken from the first row's keys.
pub fn column_names(rows: &[Row]) -> Vec<String> {
    rows.first()
        .map(|row| row.keys().map(str::to_string).collect())
        .unwrap_or_default()
}

// ============================================================================
// Analysis Results
// ============================================================================

/// Classification of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Categorical,
    /// Reserved; the analyzer never produces it.
    Datetime,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Datetime => "datetime",
        }
    }
}

/// One histogram bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub bin: String,
    pub count: usize,
}

impl HistogramBin {
    pub fn new(bin: impl Into<String>, count: usize) -> Self {
        Self {
            bin: bin.into(),
            count,
        }
    }

    /// The sentinel bucket for a column without clean values.
    pub fn no_data() -> Self {
        Self::new(NO_DATA, 0)
    }
}

/// Nearest-rank first and third quartiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q3: f64,
}

/// Summary statistics of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub mean: f64,
    /// Element at `floor(n / 2)` of the sorted values (upper middle for even n).
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation (divides by n).
    pub standard_deviation: f64,
    pub quartiles: Quartiles,
}

/// Type-specific part of an [`AnalysisResult`], tagged by column type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnStatistics {
    Numeric(NumericSummary),
    Categorical { mode: Value },
}

/// Analysis of a single column.
///
/// Serializes flat, e.g. `{"column_name": "age", "count": 3, ..., "type":
/// "numeric", "mean": 4.0, ..., "histogram": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub column_name: String,
    /// Number of clean (non-missing) values.
    pub count: usize,
    /// Number of rows whose value was missing.
    pub null_count: usize,
    /// Number of distinct clean values, compared by string form.
    pub unique_count: usize,
    #[serde(flatten)]
    pub statistics: ColumnStatistics,
    pub histogram: Vec<HistogramBin>,
}

impl AnalysisResult {
    pub fn column_type(&self) -> ColumnType {
        match self.statistics {
            ColumnStatistics::Numeric(_) => ColumnType::Numeric,
            ColumnStatistics::Categorical { .. } => ColumnType::Categorical,
        }
    }

    pub fn numeric(&self) -> Option<&NumericSummary> {
        match &self.statistics {
            ColumnStatistics::Numeric(summary) => Some(summary),
            ColumnStatistics::Categorical { .. } => None,
        }
    }

    pub fn mode(&self) -> Option<&Value> {
        match &self.statistics {
            ColumnStatistics::Categorical { mode } => Some(mode),
            ColumnStatistics::Numeric(_) => None,
        }
    }
}

// ============================================================================
// Table View Settings
// ============================================================================

/// Comparison applied by a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    Contains,
    Greater,
    Less,
    Between,
    #[serde(alias = "startsWith")]
    StartsWith,
    #[serde(alias = "endsWith")]
    EndsWith,
    #[serde(alias = "isNull")]
    IsNull,
    #[serde(alias = "isNotNull")]
    IsNotNull,
    /// Any operator name we do not recognise; matches every row.
    #[serde(other)]
    Unknown,
}

impl FromStr for FilterOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.to_ascii_lowercase().replace('_', "").as_str() {
            "equals" | "eq" | "=" => Self::Equals,
            "contains" => Self::Contains,
            "greater" | "gt" | ">" => Self::Greater,
            "less" | "lt" | "<" => Self::Less,
            "between" => Self::Between,
            "startswith" => Self::StartsWith,
            "endswith" => Self::EndsWith,
            "isnull" => Self::IsNull,
            "isnotnull" => Self::IsNotNull,
            _ => return Err(format!("unknown operator '{}'", s)),
        };
        Ok(op)
    }
}

/// A single row predicate. A list of filters is combined with AND.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub column: String,
    pub operator: FilterOperator,
    #[serde(default)]
    pub value: String,
    /// Upper bound for [`FilterOperator::Between`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<String>,
}

impl Filter {
    pub fn new(column: impl Into<String>, operator: FilterOperator, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
            value2: None,
        }
    }

    /// Inclusive range filter.
    pub fn between(
        column: impl Into<String>,
        low: impl Into<String>,
        high: impl Into<String>,
    ) -> Self {
        Self {
            value2: Some(high.into()),
            ..Self::new(column, FilterOperator::Between, low)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Single-column sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Parses `column:operator[:value[:value2]]`, as given on the command line.
impl FromStr for Filter {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| AnalysisError::InvalidFilter {
            expression: s.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = s.splitn(3, ':');
        let column = parts
            .next()
            .filter(|column| !column.is_empty())
            .ok_or_else(|| invalid("missing column"))?;
        let operator: FilterOperator = parts
            .next()
            .ok_or_else(|| invalid("missing operator"))?
            .parse()
            .map_err(|e: String| invalid(&e))?;
        let rest = parts.next().unwrap_or_default();

        // Only `between` carries two values; any other value keeps its colons.
        let (value, value2) = if operator == FilterOperator::Between {
            let (low, high) = rest
                .split_once(':')
                .ok_or_else(|| invalid("between needs <low>:<high>"))?;
            (low, Some(high.to_string()))
        } else {
            (rest, None)
        };

        Ok(Self {
            column: column.to_string(),
            operator,
            value: value.to_string(),
            value2,
        })
    }
}

/// Parses `column[:asc|desc]`.
impl FromStr for Sort {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, direction) = match s.rsplit_once(':') {
            None => (s, SortDirection::Asc),
            Some((column, dir)) => match dir.to_ascii_lowercase().as_str() {
                "asc" => (column, SortDirection::Asc),
                "desc" => (column, SortDirection::Desc),
                _ => return Err(AnalysisError::InvalidSort(s.to_string())),
            },
        };

        if column.is_empty() {
            return Err(AnalysisError::InvalidSort(s.to_string()));
        }

        Ok(Self {
            column: column.to_string(),
            direction,
        })
    }
}

// ============================================================================
// Correlation
// ============================================================================

/// Outcome of a Pearson correlation between two columns.
///
/// Serializes as the coefficient when there is one and as a diagnostic
/// string otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correlation {
    Coefficient(f64),
    /// The numeric value sequences differ in length or are empty.
    InsufficientData,
    /// One of the columns has zero variance.
    ZeroVariance,
}

impl Correlation {
    pub fn coefficient(&self) -> Option<f64> {
        match self {
            Self::Coefficient(r) => Some(*r),
            _ => None,
        }
    }

    /// Diagnostic text for the failure variants.
    pub fn diagnostic(&self) -> Option<&'static str> {
        match self {
            Self::Coefficient(_) => None,
            Self::InsufficientData => Some("Insufficient or mismatched data"),
            Self::ZeroVariance => Some("No correlation (division by zero)"),
        }
    }
}

impl fmt::Display for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.diagnostic()) {
            (Self::Coefficient(r), _) => write!(f, "{:.4}", r),
            (_, Some(text)) => f.write_str(text),
            (_, None) => Ok(()),
        }
    }
}

impl Serialize for Correlation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match (self, self.diagnostic()) {
            (Self::Coefficient(r), _) => serializer.serialize_f64(*r),
            (_, Some(text)) => serializer.serialize_str(text),
            (_, None) => serializer.serialize_unit(),
        }
    }
}
