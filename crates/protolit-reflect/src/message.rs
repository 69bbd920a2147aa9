use std::collections::BTreeMap;

use thiserror::Error;

use crate::descriptor::{FieldDescriptor, FieldType, MessageDescriptor, OneofDescriptor};
use crate::kind::Cardinality;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetFieldError {
    #[error("{message} has no field named `{name}`")]
    UnknownField { message: String, name: String },
    #[error("field {field} does not belong to {message}")]
    ForeignField { field: String, message: String },
    #[error("field {field} expects {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },
}

/// A message whose shape is only known at runtime, through its descriptor.
///
/// Values are stored by field number; iteration follows declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicMessage {
    descriptor: MessageDescriptor,
    fields: BTreeMap<u32, Value>,
}

impl DynamicMessage {
    pub fn new(descriptor: MessageDescriptor) -> Self {
        Self {
            descriptor,
            fields: BTreeMap::new(),
        }
    }

    pub fn descriptor(&self) -> &MessageDescriptor {
        &self.descriptor
    }

    /// Store a value, replacing any previous one. Setting a member of a oneof
    /// clears the other members.
    pub fn set_field(&mut self, field: &FieldDescriptor, value: Value) -> Result<(), SetFieldError> {
        if field.containing_message() != &self.descriptor {
            return Err(SetFieldError::ForeignField {
                field: field.full_name().to_string(),
                message: self.descriptor.full_name().to_string(),
            });
        }
        check_shape(field, &value)?;
        if let Some(oneof) = field.containing_oneof() {
            for member in oneof.fields() {
                self.fields.remove(&member.number());
            }
        }
        self.fields.insert(field.number(), value);
        Ok(())
    }

    pub fn set_field_by_name(
        &mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<(), SetFieldError> {
        let field = self.field_named(name)?;
        self.set_field(&field, value.into())
    }

    /// Builder-style [`Self::set_field_by_name`].
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Result<Self, SetFieldError> {
        self.set_field_by_name(name, value)?;
        Ok(self)
    }

    pub fn get_field(&self, field: &FieldDescriptor) -> Option<&Value> {
        self.fields.get(&field.number())
    }

    pub fn get_field_by_name(&self, name: &str) -> Option<&Value> {
        let field = self.descriptor.get_field_by_name(name)?;
        self.get_field(&field)
    }

    /// Whether the field counts as set. Fields with explicit presence are set
    /// once stored; others only when they differ from their default.
    pub fn has_field(&self, field: &FieldDescriptor) -> bool {
        self.get_field(field)
            .is_some_and(|value| is_present(field, value))
    }

    pub fn clear_field(&mut self, field: &FieldDescriptor) -> Option<Value> {
        self.fields.remove(&field.number())
    }

    /// The member of `oneof` currently set, if any.
    pub fn which_oneof(&self, oneof: &OneofDescriptor) -> Option<FieldDescriptor> {
        oneof.fields().find(|field| self.fields.contains_key(&field.number()))
    }

    /// Present fields with their values, in declaration order.
    pub fn present_fields(&self) -> impl Iterator<Item = (FieldDescriptor, &Value)> + '_ {
        self.descriptor.fields().filter_map(move |field| {
            let value = self.fields.get(&field.number())?;
            is_present(&field, value).then_some((field, value))
        })
    }

    fn field_named(&self, name: &str) -> Result<FieldDescriptor, SetFieldError> {
        self.descriptor
            .get_field_by_name(name)
            .ok_or_else(|| SetFieldError::UnknownField {
                message: self.descriptor.full_name().to_string(),
                name: name.to_string(),
            })
    }
}

fn is_present(field: &FieldDescriptor, value: &Value) -> bool {
    field.has_explicit_presence() || !value.is_default()
}

fn check_shape(field: &FieldDescriptor, value: &Value) -> Result<(), SetFieldError> {
    let ty = field.field_type();
    let valid = match (field.cardinality(), value) {
        (Cardinality::Singular, value) => value.is_valid_for(&ty),
        (Cardinality::Repeated, Value::List(items)) => items.iter().all(|item| item.is_valid_for(&ty)),
        (Cardinality::Map, Value::Map(entries)) => {
            let key_kind = field.map_key_kind();
            entries.iter().all(|(key, value)| {
                key_kind.is_some_and(|kind| key.is_valid_for(kind)) && value.is_valid_for(&ty)
            })
        }
        _ => false,
    };
    if valid {
        return Ok(());
    }
    Err(SetFieldError::TypeMismatch {
        field: field.full_name().to_string(),
        expected: describe_field(field, &ty),
        actual: describe_value(value),
    })
}

fn describe_type(ty: &FieldType) -> String {
    match ty {
        FieldType::Scalar(kind) => kind.name().to_string(),
        FieldType::Enum(enumeration) => enumeration.full_name().to_string(),
        FieldType::Message(message) => message.full_name().to_string(),
    }
}

fn describe_field(field: &FieldDescriptor, ty: &FieldType) -> String {
    match field.cardinality() {
        Cardinality::Singular => describe_type(ty),
        Cardinality::Repeated => format!("list of {}", describe_type(ty)),
        Cardinality::Map => match field.map_key_kind() {
            Some(key) => format!("map of {key} to {}", describe_type(ty)),
            None => format!("map to {}", describe_type(ty)),
        },
    }
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::Message(message) => message.descriptor().full_name().to_string(),
        other => other.type_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::{EnumDef, FieldDef, FileDef, MapValueDef, MessageDef};
    use crate::descriptor::DescriptorPool;
    use crate::kind::Kind;
    use crate::value::MapKey;

    fn pool() -> DescriptorPool {
        DescriptorPool::from_file(
            FileDef::new("pkg")
                .enumeration(EnumDef::new("Mode").value("OFF", 0).value("ON", 1))
                .message(MessageDef::new("Leaf").field(FieldDef::new("n", 1, Kind::Int32)))
                .message(
                    MessageDef::new("Node")
                        .oneof("payload")
                        .field(FieldDef::new("id", 1, Kind::Uint64))
                        .field(FieldDef::message("leaf", 2, "Leaf"))
                        .field(FieldDef::new("tags", 3, Kind::String).repeated())
                        .field(FieldDef::map("weights", 4, Kind::Uint32, MapValueDef::scalar(Kind::Double)))
                        .field(FieldDef::new("text", 5, Kind::String).in_oneof("payload"))
                        .field(FieldDef::new("count", 6, Kind::Int32).in_oneof("payload"))
                        .field(FieldDef::enumeration("mode", 7, "Mode").optional()),
                ),
        )
        .unwrap()
    }

    fn node(pool: &DescriptorPool) -> DynamicMessage {
        DynamicMessage::new(pool.get_message_by_name("pkg.Node").unwrap())
    }

    #[test]
    fn test_implicit_presence_skips_defaults() {
        let pool = pool();
        let mut message = node(&pool);
        message.set_field_by_name("id", 0u64).unwrap();
        message.set_field_by_name("tags", Vec::<Value>::new()).unwrap();
        assert_eq!(message.present_fields().count(), 0);

        message.set_field_by_name("id", 7u64).unwrap();
        let present: Vec<_> = message.present_fields().map(|(f, _)| f.name().to_string()).collect();
        assert_eq!(present, vec!["id"]);
    }

    #[test]
    fn test_empty_message_is_present() {
        let pool = pool();
        let leaf = DynamicMessage::new(pool.get_message_by_name("pkg.Leaf").unwrap());
        let mut message = node(&pool);
        message.set_field_by_name("leaf", leaf).unwrap();
        let field = message.descriptor().get_field_by_name("leaf").unwrap();
        assert!(message.has_field(&field));
    }

    #[test]
    fn test_explicit_presence_keeps_defaults() {
        let pool = pool();
        let mut message = node(&pool);
        message.set_field_by_name("count", 0i32).unwrap();
        message.set_field_by_name("mode", Value::Enum(0)).unwrap();
        let present: Vec<_> = message.present_fields().map(|(f, _)| f.number()).collect();
        assert_eq!(present, vec![6, 7]);
    }

    #[test]
    fn test_setting_oneof_member_clears_siblings() {
        let pool = pool();
        let mut message = node(&pool);
        message.set_field_by_name("text", "hello").unwrap();
        message.set_field_by_name("count", 3i32).unwrap();
        assert_eq!(message.get_field_by_name("text"), None);
        let oneof = message.descriptor().oneofs().next().unwrap();
        assert_eq!(message.which_oneof(&oneof).unwrap().name(), "count");
    }

    #[test]
    fn test_present_fields_follow_declaration_order() {
        let pool = pool();
        let mut message = node(&pool);
        message.set_field_by_name("tags", vec![Value::from("a")]).unwrap();
        message.set_field_by_name("id", 1u64).unwrap();
        let present: Vec<_> = message.present_fields().map(|(f, _)| f.number()).collect();
        assert_eq!(present, vec![1, 3]);
    }

    #[test]
    fn test_type_mismatch() {
        let pool = pool();
        let mut message = node(&pool);
        let err = message.set_field_by_name("id", 1i32).unwrap_err();
        assert_eq!(
            err,
            SetFieldError::TypeMismatch {
                field: "pkg.Node.id".to_string(),
                expected: "uint64".to_string(),
                actual: "int32".to_string(),
            }
        );
    }

    #[test]
    fn test_map_key_mismatch() {
        let pool = pool();
        let mut message = node(&pool);
        let weights: Value = [(MapKey::from("x"), 1.0f64)].into_iter().collect();
        let err = message.set_field_by_name("weights", weights).unwrap_err();
        assert!(matches!(err, SetFieldError::TypeMismatch { .. }));

        let weights: Value = [(1u32, 1.0f64)].into_iter().collect();
        message.set_field_by_name("weights", weights).unwrap();
    }

    #[test]
    fn test_nested_message_type_is_checked() {
        let pool = pool();
        let mut message = node(&pool);
        let err = message.set_field_by_name("leaf", node(&pool)).unwrap_err();
        assert_eq!(
            err,
            SetFieldError::TypeMismatch {
                field: "pkg.Node.leaf".to_string(),
                expected: "pkg.Leaf".to_string(),
                actual: "pkg.Node".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_field() {
        let pool = pool();
        let mut message = node(&pool);
        assert!(matches!(
            message.set_field_by_name("nope", 1i32),
            Err(SetFieldError::UnknownField { .. })
        ));
    }
}
