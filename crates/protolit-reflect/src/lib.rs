//! Descriptors and dynamic values for protobuf-shaped messages.
//!
//! A [`DescriptorPool`] is built from plain [`FileDef`] definitions (in code
//! or deserialized from JSON). [`DynamicMessage`] holds field values checked
//! against a [`MessageDescriptor`], so code can inspect any message without
//! generated types.

mod defs;
mod descriptor;
mod kind;
mod load;
mod message;
mod value;

pub use defs::{EnumDef, EnumValueDef, FieldDef, FileDef, Label, MapDef, MapValueDef, MessageDef};
pub use descriptor::{
    DescriptorError, DescriptorPool, EnumDescriptor, EnumValue, FieldDescriptor, FieldType,
    MessageDescriptor, OneofDescriptor,
};
pub use kind::{Cardinality, Kind};
pub use load::LoadError;
pub use message::{DynamicMessage, SetFieldError};
pub use value::{EnumNumber, MapKey, Scalar, Value, ValueRef};
