//! Field kinds and cardinalities.

use core::fmt::{self, Display};

use serde::Deserialize;

/// The wire-level kind of a field, as declared in a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Bool,
    Int32,
    Sint32,
    Sfixed32,
    Int64,
    Sint64,
    Sfixed64,
    Uint32,
    Fixed32,
    Uint64,
    Fixed64,
    Float,
    Double,
    String,
    Bytes,
    Enum,
    Message,
}

impl Kind {
    /// The protobuf spelling of the kind (`"sfixed32"`, `"message"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int32 => "int32",
            Kind::Sint32 => "sint32",
            Kind::Sfixed32 => "sfixed32",
            Kind::Int64 => "int64",
            Kind::Sint64 => "sint64",
            Kind::Sfixed64 => "sfixed64",
            Kind::Uint32 => "uint32",
            Kind::Fixed32 => "fixed32",
            Kind::Uint64 => "uint64",
            Kind::Fixed64 => "fixed64",
            Kind::Float => "float",
            Kind::Double => "double",
            Kind::String => "string",
            Kind::Bytes => "bytes",
            Kind::Enum => "enum",
            Kind::Message => "message",
        }
    }

    /// The Go type a scalar kind is generated as.
    ///
    /// Returns `None` for [`Kind::Enum`] and [`Kind::Message`], whose Go type
    /// depends on the referenced descriptor.
    pub fn go_type(self) -> Option<&'static str> {
        match self {
            Kind::Bool => Some("bool"),
            Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => Some("int32"),
            Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => Some("int64"),
            Kind::Uint32 | Kind::Fixed32 => Some("uint32"),
            Kind::Uint64 | Kind::Fixed64 => Some("uint64"),
            Kind::Float => Some("float32"),
            Kind::Double => Some("float64"),
            Kind::String => Some("string"),
            Kind::Bytes => Some("[]byte"),
            Kind::Enum | Kind::Message => None,
        }
    }

    /// Whether the kind refers to another descriptor through a type name.
    pub fn is_named(self) -> bool {
        matches!(self, Kind::Enum | Kind::Message)
    }

    /// Whether a map may be keyed by this kind.
    pub fn is_valid_map_key(self) -> bool {
        !matches!(
            self,
            Kind::Float | Kind::Double | Kind::Bytes | Kind::Enum | Kind::Message
        )
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How many values a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Singular,
    Repeated,
    Map,
}
