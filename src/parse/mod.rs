use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::Value;
use std::fmt;

use crate::errors::GenError;
use crate::safety::validate_relative_path;
use crate::wire::{FileSet, GeneratedFile};

/// Object entries in source order. `serde_json::Map` would fold duplicate
/// keys, so the object is visited directly.
struct Entries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for Entries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Entries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object mapping file paths to file contents")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Entries, A::Error> {
                let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((k, v)) = map.next_entry::<String, Value>()? {
                    out.push((k, v));
                }
                Ok(Entries(out))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Turn the model's raw reply into a FileSet.
///
/// The reply must be exactly one JSON object whose values are all strings.
/// Nothing is coerced: a number, array or nested object as a value rejects the
/// whole reply, as does any key that is not a clean relative path.
pub fn parse(raw: &str) -> Result<FileSet, GenError> {
    let text = raw.trim();
    let Entries(entries) = serde_json::from_str::<Entries>(text)
        .map_err(|e| GenError::parse(e.to_string(), raw))?;

    let mut files = Vec::with_capacity(entries.len());
    for (path, value) in entries {
        if let Err(v) = validate_relative_path(&path) {
            return Err(GenError::parse(format!("invalid path {path:?}: {v}"), raw));
        }
        let content = match value {
            Value::String(s) => s,
            other => {
                return Err(GenError::parse(
                    format!("value for {path:?} is {}, expected string", type_name(&other)),
                    raw,
                ))
            }
        };
        files.push(GeneratedFile { path, content });
    }

    if files.is_empty() {
        return Err(GenError::EmptyResult);
    }
    Ok(FileSet::new(files))
}
