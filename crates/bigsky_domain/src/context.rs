use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Replacement content for a tagged region of a system message
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Text(String),
    Pairs(IndexMap<String, Value>),
    List(Vec<Value>),
    /// Numbers, booleans and `null`, written as they read
    Scalar(Value),
}

impl ContextValue {
    /// Renders the value as it appears between the tags. Key/value pairs
    /// become a newline-prefixed bullet list, one `- key: value` per line.
    pub fn render(&self) -> String {
        match self {
            ContextValue::Text(text) => text.clone(),
            ContextValue::Pairs(pairs) => render_bullets(pairs.iter().map(|(k, v)| (k.clone(), v))),
            ContextValue::List(items) => {
                render_bullets(items.iter().enumerate().map(|(i, v)| (i.to_string(), v)))
            }
            ContextValue::Scalar(value) => scalar_text(value),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::Text(value.to_string())
    }
}

fn render_bullets<'a>(entries: impl Iterator<Item = (String, &'a Value)>) -> String {
    entries.fold("\n".to_string(), |mut acc, (key, value)| {
        acc.push_str(&format!("- {key}: {}\n", scalar_text(value)));
        acc
    })
}

/// Text of a JSON scalar as it reads in prompts and messages. Strings are
/// unquoted and `null` is empty.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Replaces the inner content of the first `<tag>…</tag>` region of `text`
/// with the rendered `context`. Text without the tag is returned unchanged.
pub fn inject(text: &str, tag: &str, context: &ContextValue) -> String {
    let tag = regex::escape(tag);
    let Ok(pattern) = Regex::new(&format!("(?s)<{tag}>(.*?)</{tag}>")) else {
        return text.to_string();
    };

    match pattern.captures(text).and_then(|captures| captures.get(1)) {
        Some(inner) => {
            let mut updated = String::with_capacity(text.len());
            updated.push_str(&text[..inner.start()]);
            updated.push_str(&context.render());
            updated.push_str(&text[inner.end()..]);
            updated
        }
        None => text.to_string(),
    }
}

/// Accepts an object, `null`, or an empty list for a case's context. Fixtures
/// exported from PHP encode an empty mapping as `[]`.
pub fn deserialize_context<'de, D>(
    deserializer: D,
) -> std::result::Result<IndexMap<String, ContextValue>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Map(IndexMap<String, ContextValue>),
        List(Vec<Value>),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(IndexMap::new()),
        Some(Raw::Map(map)) => Ok(map),
        Some(Raw::List(list)) if list.is_empty() => Ok(IndexMap::new()),
        Some(Raw::List(_)) => Err(serde::de::Error::custom(
            "context must be a mapping from tag name to value",
        )),
    }
}
