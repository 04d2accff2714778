use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One academic program as written by the scraper.
///
/// The corpus file stores every field at the top level of the record object
/// next to `name` and `url`; field order is the order in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecord", into = "RawRecord")]
pub struct ProgramRecord {
    pub name: String,
    pub url: String,
    pub fields: Vec<(String, FieldValue)>,
}

impl ProgramRecord {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field append, mostly for fixtures
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.push((name.into(), value));
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<ListItem>),
    /// Numbers, objects, booleans and nulls. Kept for round-tripping, never chunked.
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    /// Directions are stored as `{"code": "01.04.02", "name": "..."}`
    Structured { code: String, name: String },
    /// Companies are stored as bare strings
    Plain(String),
}

impl ListItem {
    /// Human-readable form used in list chunks
    pub fn render(&self) -> String {
        match self {
            ListItem::Structured { code, name } => format!("{} {}", code, name).trim().to_string(),
            ListItem::Plain(text) => text.trim().to_string(),
        }
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(ListItem::Structured {
                code: scalar_text(map.get("code")),
                name: scalar_text(map.get("name")),
            }),
            Value::String(text) => Some(ListItem::Plain(text)),
            Value::Number(n) => Some(ListItem::Plain(n.to_string())),
            Value::Bool(b) => Some(ListItem::Plain(b.to_string())),
            Value::Null | Value::Array(_) => None,
        }
    }

    fn into_value(self) -> Value {
        match self {
            ListItem::Structured { code, name } => {
                let mut map = Map::new();
                map.insert("code".to_string(), Value::String(code));
                map.insert("name".to_string(), Value::String(name));
                Value::Object(map)
            }
            ListItem::Plain(text) => Value::String(text),
        }
    }
}

fn scalar_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => FieldValue::Text(text),
            Value::Array(items) => {
                FieldValue::List(items.into_iter().filter_map(ListItem::from_value).collect())
            }
            other => FieldValue::Other(other),
        }
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Text(text) => Value::String(text),
            FieldValue::List(items) => {
                Value::Array(items.into_iter().map(ListItem::into_value).collect())
            }
            FieldValue::Other(other) => other,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawRecord {
    name: String,
    url: String,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl From<RawRecord> for ProgramRecord {
    fn from(raw: RawRecord) -> Self {
        Self {
            name: raw.name,
            url: raw.url,
            fields: raw
                .rest
                .into_iter()
                .map(|(field, value)| (field, FieldValue::from(value)))
                .collect(),
        }
    }
}

impl From<ProgramRecord> for RawRecord {
    fn from(record: ProgramRecord) -> Self {
        Self {
            name: record.name,
            url: record.url,
            rest: record
                .fields
                .into_iter()
                .map(|(field, value)| (field, Value::from(value)))
                .collect(),
        }
    }
}

/// An indexable fragment. Its position in the persisted sequence is also its
/// row id in the vector index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    /// Program name
    pub source: String,
    pub field: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &str = r#"[
        {
            "name": "Искусственный интеллект",
            "url": "https://abit.itmo.ru/program/master/ai",
            "about": "Программа готовит инженеров машинного обучения.",
            "directions": [{"code": "01.04.02", "name": "Прикладная математика"}],
            "companies": ["Яндекс", "Сбер"],
            "seats": 42
        }
    ]"#;

    #[test]
    fn test_parse_corpus_preserves_field_order() {
        let records: Vec<ProgramRecord> = serde_json::from_str(CORPUS).unwrap();
        assert_eq!(records.len(), 1);
        let names: Vec<&str> = records[0].fields.iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(names, vec!["about", "directions", "companies", "seats"]);
    }

    #[test]
    fn test_field_kinds() {
        let records: Vec<ProgramRecord> = serde_json::from_str(CORPUS).unwrap();
        let record = &records[0];
        assert!(matches!(record.field("about"), Some(FieldValue::Text(_))));
        assert_eq!(
            record.field("directions"),
            Some(&FieldValue::List(vec![ListItem::Structured {
                code: "01.04.02".to_string(),
                name: "Прикладная математика".to_string(),
            }]))
        );
        assert_eq!(
            record.field("companies"),
            Some(&FieldValue::List(vec![
                ListItem::Plain("Яндекс".to_string()),
                ListItem::Plain("Сбер".to_string()),
            ]))
        );
        assert!(matches!(record.field("seats"), Some(FieldValue::Other(_))));
    }

    #[test]
    fn test_missing_code_renders_name_only() {
        let item = ListItem::from_value(serde_json::json!({"name": "Data Science"})).unwrap();
        assert_eq!(item.render(), "Data Science");
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = ProgramRecord::new("P", "https://example.org")
            .with_field("about", FieldValue::Text("x".to_string()));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["about"], "x");
        assert_eq!(value["name"], "P");
    }
}
