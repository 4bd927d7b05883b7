//! Game payloads carried between the caller and the upstream API

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The four fields forwarded on add-game. Values are carried as-is;
/// `releaseYear` may be a number or a string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    pub name: Value,
    pub genre: Value,
    pub release_year: Value,
    pub developer: Value,
}

impl NewGame {
    /// Pick the required fields out of an inbound JSON body.
    ///
    /// Returns `None` when the body is not an object or any field is missing
    /// or falsy (`null`, `false`, `0`, `""`). Extra fields are dropped.
    pub fn from_body(body: &Value) -> Option<Self> {
        let obj = body.as_object()?;
        let field = |key: &str| obj.get(key).filter(|v| is_truthy(v)).cloned();

        Some(Self {
            name: field("name")?,
            genre: field("genre")?,
            release_year: field("releaseYear")?,
            developer: field("developer")?,
        })
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
