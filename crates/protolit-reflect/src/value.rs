use ahash::AHashMap;

use crate::descriptor::FieldType;
use crate::kind::Kind;
use crate::message::DynamicMessage;

/// Numeric value of an enumeration. Numbers without a declared symbol are kept as is.
pub type EnumNumber = i32;

/// A field value. The shape is closed: every consumer matches exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Message(DynamicMessage),
    List(Vec<Value>),
    Map(AHashMap<MapKey, Value>),
    Enum(EnumNumber),
    Bytes(Vec<u8>),
    String(String),
    Scalar(Scalar),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

/// Map keys. Within one map all keys share a variant, so the derived order is
/// numeric for integers, lexicographic for strings and `false < true`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MapKey {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    String(String),
}

/// A borrowed view of a [`Value`], handed out while walking a message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueRef<'a> {
    Message(&'a DynamicMessage),
    List(&'a [Value]),
    Map(&'a AHashMap<MapKey, Value>),
    Enum(EnumNumber),
    Bytes(&'a [u8]),
    String(&'a str),
    Scalar(Scalar),
}

impl Value {
    pub fn as_ref(&self) -> ValueRef<'_> {
        match self {
            Value::Message(message) => ValueRef::Message(message),
            Value::List(items) => ValueRef::List(items),
            Value::Map(entries) => ValueRef::Map(entries),
            Value::Enum(number) => ValueRef::Enum(*number),
            Value::Bytes(bytes) => ValueRef::Bytes(bytes),
            Value::String(string) => ValueRef::String(string),
            Value::Scalar(scalar) => ValueRef::Scalar(*scalar),
        }
    }

    /// Whether the value equals the default of its type. Messages never do:
    /// a set message is present even when every field inside it is unset.
    pub fn is_default(&self) -> bool {
        match self {
            Value::Message(_) => false,
            Value::List(items) => items.is_empty(),
            Value::Map(entries) => entries.is_empty(),
            Value::Enum(number) => *number == 0,
            Value::Bytes(bytes) => bytes.is_empty(),
            Value::String(string) => string.is_empty(),
            Value::Scalar(scalar) => scalar.is_default(),
        }
    }

    /// Short description of the value's shape, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Message(_) => "message",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Enum(_) => "enum",
            Value::Bytes(_) => "bytes",
            Value::String(_) => "string",
            Value::Scalar(scalar) => scalar.type_name(),
        }
    }

    /// Whether this value can be stored as one value of the given type.
    pub fn is_valid_for(&self, ty: &FieldType) -> bool {
        match (self, ty) {
            (Value::Message(message), FieldType::Message(descriptor)) => {
                message.descriptor() == descriptor
            }
            (Value::Enum(_), FieldType::Enum(_)) => true,
            (Value::Bytes(_), FieldType::Scalar(Kind::Bytes)) => true,
            (Value::String(_), FieldType::Scalar(Kind::String)) => true,
            (Value::Scalar(scalar), FieldType::Scalar(kind)) => scalar.is_valid_for(*kind),
            _ => false,
        }
    }
}

impl Scalar {
    /// Floats compare by bit pattern, so `-0.0` is not a default.
    pub fn is_default(&self) -> bool {
        match *self {
            Scalar::Bool(value) => !value,
            Scalar::I32(value) => value == 0,
            Scalar::I64(value) => value == 0,
            Scalar::U32(value) => value == 0,
            Scalar::U64(value) => value == 0,
            Scalar::F32(value) => value.to_bits() == 0,
            Scalar::F64(value) => value.to_bits() == 0,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::I32(_) => "int32",
            Scalar::I64(_) => "int64",
            Scalar::U32(_) => "uint32",
            Scalar::U64(_) => "uint64",
            Scalar::F32(_) => "float",
            Scalar::F64(_) => "double",
        }
    }

    pub fn is_valid_for(&self, kind: Kind) -> bool {
        matches!(
            (self, kind),
            (Scalar::Bool(_), Kind::Bool)
                | (Scalar::I32(_), Kind::Int32 | Kind::Sint32 | Kind::Sfixed32)
                | (Scalar::I64(_), Kind::Int64 | Kind::Sint64 | Kind::Sfixed64)
                | (Scalar::U32(_), Kind::Uint32 | Kind::Fixed32)
                | (Scalar::U64(_), Kind::Uint64 | Kind::Fixed64)
                | (Scalar::F32(_), Kind::Float)
                | (Scalar::F64(_), Kind::Double)
        )
    }
}

impl MapKey {
    pub fn type_name(&self) -> &'static str {
        match self {
            MapKey::Bool(_) => "bool",
            MapKey::I32(_) => "int32",
            MapKey::I64(_) => "int64",
            MapKey::U32(_) => "uint32",
            MapKey::U64(_) => "uint64",
            MapKey::String(_) => "string",
        }
    }

    pub fn is_valid_for(&self, kind: Kind) -> bool {
        match self {
            MapKey::String(_) => kind == Kind::String,
            MapKey::Bool(value) => Scalar::Bool(*value).is_valid_for(kind),
            MapKey::I32(value) => Scalar::I32(*value).is_valid_for(kind),
            MapKey::I64(value) => Scalar::I64(*value).is_valid_for(kind),
            MapKey::U32(value) => Scalar::U32(*value).is_valid_for(kind),
            MapKey::U64(value) => Scalar::U64(*value).is_valid_for(kind),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::$variant(value)
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Scalar(Scalar::$variant(value))
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i32 => I32,
    i64 => I64,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

macro_rules! impl_from_key {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for MapKey {
                fn from(value: $ty) -> Self {
                    MapKey::$variant(value)
                }
            }
        )*
    };
}

impl_from_key! {
    bool => Bool,
    i32 => I32,
    i64 => I64,
    u32 => U32,
    u64 => U64,
    String => String,
}

impl From<&str> for MapKey {
    fn from(value: &str) -> Self {
        MapKey::String(value.to_string())
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Value::Scalar(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<DynamicMessage> for Value {
    fn from(value: DynamicMessage) -> Self {
        Value::Message(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<AHashMap<MapKey, Value>> for Value {
    fn from(value: AHashMap<MapKey, Value>) -> Self {
        Value::Map(value)
    }
}

impl<K: Into<MapKey>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Value::Map(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
