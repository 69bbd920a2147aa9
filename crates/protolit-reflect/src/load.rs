//! Decoding descriptor sets and message values from JSON.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::Value as Json;
use thiserror::Error;

use crate::defs::FileDef;
use crate::descriptor::{DescriptorError, DescriptorPool, FieldDescriptor, FieldType, MessageDescriptor};
use crate::kind::{Cardinality, Kind};
use crate::message::{DynamicMessage, SetFieldError};
use crate::value::{MapKey, Scalar, Value};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error("unknown message type `{name}`")]
    UnknownMessage { name: String },
    #[error("{path}: {message}")]
    InvalidValue { path: String, message: String },
}

/// A descriptor set is either one file or a list of files.
#[derive(Deserialize)]
#[serde(untagged)]
enum DescriptorSet {
    One(FileDef),
    Many(Vec<FileDef>),
}

impl DescriptorPool {
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        let files = match serde_json::from_str(text)? {
            DescriptorSet::One(file) => vec![file],
            DescriptorSet::Many(files) => files,
        };
        Ok(DescriptorPool::new(files)?)
    }

    /// Decode a value of the named message type from JSON text.
    pub fn decode_message_json(&self, message: &str, text: &str) -> Result<DynamicMessage, LoadError> {
        let descriptor = self
            .get_message_by_name(message)
            .ok_or_else(|| LoadError::UnknownMessage {
                name: message.to_string(),
            })?;
        tracing::debug!(message, bytes = text.len(), "decoding message from JSON");
        let json: Json = serde_json::from_str(text)?;
        DynamicMessage::from_json(&descriptor, &json)
    }
}

impl DynamicMessage {
    /// Decode from a JSON object keyed by field name. `null` members are skipped.
    pub fn from_json(descriptor: &MessageDescriptor, json: &Json) -> Result<Self, LoadError> {
        let mut path = String::from("$");
        decode_message(descriptor, json, &mut path)
    }
}

fn invalid(path: &str, message: impl Into<String>) -> LoadError {
    LoadError::InvalidValue {
        path: path.to_string(),
        message: message.into(),
    }
}

fn decode_message(
    descriptor: &MessageDescriptor,
    json: &Json,
    path: &mut String,
) -> Result<DynamicMessage, LoadError> {
    let Json::Object(members) = json else {
        return Err(invalid(
            path,
            format!("expected an object for {}", descriptor.full_name()),
        ));
    };
    let mut message = DynamicMessage::new(descriptor.clone());
    for (name, json) in members {
        if json.is_null() {
            continue;
        }
        let len = path.len();
        path.push('.');
        path.push_str(name);
        let Some(field) = descriptor.get_field_by_name(name) else {
            return Err(invalid(
                path,
                format!("{} has no field named `{name}`", descriptor.full_name()),
            ));
        };
        if let Some(oneof) = field.real_oneof()
            && let Some(other) = message.which_oneof(&oneof)
        {
            return Err(invalid(
                path,
                format!("oneof `{}` already has `{}` set", oneof.name(), other.name()),
            ));
        }
        let value = decode_field(&field, json, path)?;
        message
            .set_field(&field, value)
            .map_err(|err: SetFieldError| invalid(path, err.to_string()))?;
        path.truncate(len);
    }
    Ok(message)
}

fn decode_field(field: &FieldDescriptor, json: &Json, path: &mut String) -> Result<Value, LoadError> {
    let ty = field.field_type();
    match field.cardinality() {
        Cardinality::Singular => decode_single(&ty, json, path),
        Cardinality::Repeated => {
            let Json::Array(items) = json else {
                return Err(invalid(path, "expected an array"));
            };
            let mut values = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let len = path.len();
                path.push_str(&format!("[{index}]"));
                values.push(decode_single(&ty, item, path)?);
                path.truncate(len);
            }
            Ok(Value::List(values))
        }
        Cardinality::Map => {
            let Json::Object(entries) = json else {
                return Err(invalid(path, "expected an object"));
            };
            let key_kind = field
                .map_key_kind()
                .ok_or_else(|| invalid(path, "map field without a key type"))?;
            let mut map = ahash::AHashMap::with_capacity(entries.len());
            for (key, item) in entries {
                let len = path.len();
                path.push_str(&format!("[{key:?}]"));
                let key = decode_map_key(key_kind, key, path)?;
                let value = decode_single(&ty, item, path)?;
                map.insert(key, value);
                path.truncate(len);
            }
            Ok(Value::Map(map))
        }
    }
}

fn decode_single(ty: &FieldType, json: &Json, path: &mut String) -> Result<Value, LoadError> {
    match ty {
        FieldType::Message(descriptor) => Ok(Value::Message(decode_message(descriptor, json, path)?)),
        FieldType::Enum(enumeration) => match json {
            Json::String(symbol) => enumeration
                .value_by_name(symbol)
                .map(|value| Value::Enum(value.number))
                .ok_or_else(|| {
                    invalid(
                        path,
                        format!("`{symbol}` is not a value of {}", enumeration.full_name()),
                    )
                }),
            Json::Number(_) => Ok(Value::Enum(integer(json, path)?)),
            _ => Err(invalid(path, "expected an enum name or number")),
        },
        FieldType::Scalar(kind) => decode_scalar(*kind, json, path),
    }
}

fn decode_scalar(kind: Kind, json: &Json, path: &str) -> Result<Value, LoadError> {
    let value = match kind {
        Kind::Bool => match json {
            Json::Bool(value) => Scalar::Bool(*value).into(),
            _ => return Err(invalid(path, "expected a boolean")),
        },
        Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => Scalar::I32(integer(json, path)?).into(),
        Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => Scalar::I64(integer(json, path)?).into(),
        Kind::Uint32 | Kind::Fixed32 => Scalar::U32(integer(json, path)?).into(),
        Kind::Uint64 | Kind::Fixed64 => Scalar::U64(integer(json, path)?).into(),
        Kind::Float => Scalar::F32(float(json, path)? as f32).into(),
        Kind::Double => Scalar::F64(float(json, path)?).into(),
        Kind::String => match json {
            Json::String(value) => Value::String(value.clone()),
            _ => return Err(invalid(path, "expected a string")),
        },
        Kind::Bytes => Value::Bytes(bytes(json, path)?),
        Kind::Enum | Kind::Message => {
            return Err(invalid(path, format!("{kind} is not a scalar kind")));
        }
    };
    Ok(value)
}

/// Integers come as JSON numbers or, for 64-bit values, decimal strings.
fn integer<T>(json: &Json, path: &str) -> Result<T, LoadError>
where
    T: TryFrom<i64> + TryFrom<u64> + core::str::FromStr,
{
    let out_of_range = || invalid(path, format!("{json} is out of range"));
    match json {
        Json::Number(number) => {
            if let Some(value) = number.as_u64() {
                T::try_from(value).map_err(|_| out_of_range())
            } else if let Some(value) = number.as_i64() {
                T::try_from(value).map_err(|_| out_of_range())
            } else {
                Err(invalid(path, format!("expected an integer, got {number}")))
            }
        }
        Json::String(text) => text
            .parse()
            .map_err(|_| invalid(path, format!("`{text}` is not a valid integer"))),
        _ => Err(invalid(path, "expected an integer")),
    }
}

fn float(json: &Json, path: &str) -> Result<f64, LoadError> {
    match json {
        Json::Number(number) => number
            .as_f64()
            .ok_or_else(|| invalid(path, format!("{number} is not a float"))),
        Json::String(text) => match text.as_str() {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            other => other
                .parse()
                .map_err(|_| invalid(path, format!("`{other}` is not a valid float"))),
        },
        _ => Err(invalid(path, "expected a number")),
    }
}

/// Bytes come as standard base64 or as an array of byte numbers.
fn bytes(json: &Json, path: &str) -> Result<Vec<u8>, LoadError> {
    match json {
        Json::String(text) => STANDARD
            .decode(text)
            .map_err(|err| invalid(path, format!("invalid base64: {err}"))),
        Json::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|byte| u8::try_from(byte).ok())
                    .ok_or_else(|| invalid(path, format!("{item} is not a byte")))
            })
            .collect(),
        _ => Err(invalid(path, "expected base64 text or an array of bytes")),
    }
}

fn decode_map_key(kind: Kind, key: &str, path: &str) -> Result<MapKey, LoadError> {
    let bad_key = || invalid(path, format!("`{key}` is not a valid {kind} key"));
    let key = match kind {
        Kind::String => MapKey::String(key.to_string()),
        Kind::Bool => match key {
            "true" => MapKey::Bool(true),
            "false" => MapKey::Bool(false),
            _ => return Err(bad_key()),
        },
        Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => MapKey::I32(key.parse().map_err(|_| bad_key())?),
        Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => MapKey::I64(key.parse().map_err(|_| bad_key())?),
        Kind::Uint32 | Kind::Fixed32 => MapKey::U32(key.parse().map_err(|_| bad_key())?),
        Kind::Uint64 | Kind::Fixed64 => MapKey::U64(key.parse().map_err(|_| bad_key())?),
        Kind::Float | Kind::Double | Kind::Bytes | Kind::Enum | Kind::Message => {
            return Err(bad_key());
        }
    };
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DESCRIPTORS: &str = r#"{
        "package": "demo",
        "enums": [{ "name": "Level", "values": [{ "name": "LOW", "number": 0 }, { "name": "HIGH", "number": 1 }] }],
        "messages": [{
            "name": "Probe",
            "oneofs": ["target"],
            "fields": [
                { "name": "level", "number": 1, "type": "enum", "type_name": "Level" },
                { "name": "payload", "number": 2, "type": "bytes" },
                { "name": "big", "number": 3, "type": "uint64" },
                { "name": "ratio", "number": 4, "type": "double" },
                { "name": "scores", "number": 5, "type": "message", "map": { "key": "int32", "value": { "type": "sint64" } } },
                { "name": "host", "number": 6, "type": "string", "oneof": "target" },
                { "name": "port", "number": 7, "type": "uint32", "oneof": "target" },
                { "name": "children", "number": 8, "type": "message", "type_name": "Probe", "label": "repeated" }
            ]
        }]
    }"#;

    fn probe() -> MessageDescriptor {
        DescriptorPool::from_json(DESCRIPTORS)
            .unwrap()
            .get_message_by_name("demo.Probe")
            .unwrap()
    }

    #[test]
    fn test_decode_scalars() {
        let descriptor = probe();
        let message = DynamicMessage::from_json(
            &descriptor,
            &json!({
                "level": "HIGH",
                "payload": "AQID",
                "big": "18446744073709551615",
                "ratio": "-Infinity",
                "scores": { "-1": "5", "2": 7 },
            }),
        )
        .unwrap();
        assert_eq!(message.get_field_by_name("level"), Some(&Value::Enum(1)));
        assert_eq!(message.get_field_by_name("payload"), Some(&Value::Bytes(vec![1, 2, 3])));
        assert_eq!(message.get_field_by_name("big"), Some(&Value::from(u64::MAX)));
        assert_eq!(message.get_field_by_name("ratio"), Some(&Value::from(f64::NEG_INFINITY)));
        let Some(Value::Map(scores)) = message.get_field_by_name("scores") else {
            panic!("expected a map");
        };
        assert_eq!(scores.get(&MapKey::I32(-1)), Some(&Value::from(5i64)));
        assert_eq!(scores.get(&MapKey::I32(2)), Some(&Value::from(7i64)));
    }

    #[test]
    fn test_bytes_as_array_and_unknown_enum_number() {
        let descriptor = probe();
        let message =
            DynamicMessage::from_json(&descriptor, &json!({ "payload": [0, 255], "level": 9 })).unwrap();
        assert_eq!(message.get_field_by_name("payload"), Some(&Value::Bytes(vec![0, 255])));
        assert_eq!(message.get_field_by_name("level"), Some(&Value::Enum(9)));
    }

    #[test]
    fn test_error_path_points_into_list() {
        let descriptor = probe();
        let err = DynamicMessage::from_json(
            &descriptor,
            &json!({ "children": [{}, { "port": -1 }] }),
        )
        .unwrap_err();
        let LoadError::InvalidValue { path, .. } = err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(path, "$.children[1].port");
    }

    #[test]
    fn test_two_oneof_members_rejected() {
        let descriptor = probe();
        let err = DynamicMessage::from_json(&descriptor, &json!({ "host": "a", "port": 1 })).unwrap_err();
        assert!(err.to_string().contains("oneof `target`"), "{err}");
    }

    #[test]
    fn test_unknown_enum_symbol() {
        let descriptor = probe();
        let err = DynamicMessage::from_json(&descriptor, &json!({ "level": "MEDIUM" })).unwrap_err();
        assert_eq!(err.to_string(), "$.level: `MEDIUM` is not a value of demo.Level");
    }

    #[test]
    fn test_decode_message_json_unknown_type() {
        let pool = DescriptorPool::from_json(DESCRIPTORS).unwrap();
        assert!(matches!(
            pool.decode_message_json("demo.Missing", "{}"),
            Err(LoadError::UnknownMessage { .. })
        ));
    }

    #[test]
    fn test_descriptor_set_as_list() {
        let pool = DescriptorPool::from_json(&format!("[{DESCRIPTORS}]")).unwrap();
        assert!(pool.get_enum_by_name("demo.Level").is_some());
    }
}
