pub mod columns;

use std::borrow::Cow;
use std::io::Read;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::{AgingError, Result};

pub use columns::ColumnIndex;

/// header option carrying the as-of date
pub const REPORT_DATE_OPTION: &str = "report_date";

/// deserialize through a json value and fall back to the default on mismatch
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// like [`lenient`] but per element: a malformed entry becomes its default
/// and keeps its position, a non-array becomes empty
fn lenient_seq<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .map(|item| T::deserialize(item).unwrap_or_default())
        .collect())
}

/// top-level report document
///
/// Every structural field is optional: a missing key, a `null`, or a value of
/// the wrong shape deserializes to its empty default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "Header", default, deserialize_with = "lenient")]
    pub header: ReportHeader,
    #[serde(rename = "Columns", default, deserialize_with = "lenient")]
    pub columns: Columns,
    #[serde(rename = "Rows", default, deserialize_with = "lenient")]
    pub rows: Rows,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportHeader {
    #[serde(rename = "Time", default)]
    pub time: Option<Value>,
    #[serde(rename = "Option", default, deserialize_with = "lenient_seq")]
    pub options: Vec<ReportOption>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportOption {
    #[serde(rename = "Name", default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(rename = "Value", default, deserialize_with = "lenient")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Columns {
    #[serde(rename = "Column", default, deserialize_with = "lenient_seq")]
    pub column: Vec<ColumnDescriptor>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    #[serde(rename = "ColTitle", default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(rename = "MetaData", default, deserialize_with = "lenient_seq")]
    pub metadata: Vec<ColumnMetaData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnMetaData {
    #[serde(rename = "Name", default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(rename = "Value", default, deserialize_with = "lenient")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rows {
    #[serde(rename = "Row", default, deserialize_with = "lenient_seq")]
    pub row: Vec<Row>,
}

/// a section (with nested rows) or a data row (with cells)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Row {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(rename = "Rows", default, deserialize_with = "lenient")]
    pub rows: Rows,
    #[serde(rename = "ColData", default, deserialize_with = "lenient_seq")]
    pub col_data: Vec<Cell>,
}

/// one report cell; `value` may be a string or a number
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
}

fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

impl Cell {
    /// display value as text; numbers are rendered without loss
    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.value.as_ref().and_then(scalar_text)
    }

    /// auxiliary identifier, ignoring blanks
    pub fn id(&self) -> Option<Cow<'_, str>> {
        self.id
            .as_ref()
            .and_then(scalar_text)
            .filter(|id| !id.trim().is_empty())
    }
}

impl Row {
    pub fn is_section(&self) -> bool {
        self.kind.as_deref() == Some("Section")
    }

    pub fn is_data(&self) -> bool {
        self.kind.as_deref() == Some("Data")
    }
}

impl Report {
    /// parse a report from a json string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| AgingError::InvalidDocument {
            message: e.to_string(),
        })
    }

    /// parse a report from a reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| AgingError::InvalidDocument {
            message: e.to_string(),
        })
    }

    /// report generation time, verbatim
    pub fn generated_at(&self) -> Option<&Value> {
        self.header.time.as_ref()
    }

    /// value of the first header option with this name and a non-empty value
    pub fn option(&self, name: &str) -> Option<&str> {
        self.header
            .options
            .iter()
            .filter(|opt| opt.name.as_deref() == Some(name))
            .filter_map(|opt| opt.value.as_deref())
            .find(|value| !value.is_empty())
    }

    /// data rows nested one level inside top-level sections
    pub fn data_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows
            .row
            .iter()
            .filter(|section| section.is_section())
            .flat_map(|section| section.rows.row.iter())
            .filter(|entry| entry.is_data())
    }
}
