//! Plain definitions a [`DescriptorPool`](crate::DescriptorPool) is built from.
//!
//! The same types are used by the programmatic builder and by the JSON
//! descriptor-set format, so a set written by hand and one constructed in a
//! test go through identical validation.

use serde::Deserialize;

use crate::kind::Kind;

/// One file's worth of definitions under a single package.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileDef {
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub messages: Vec<MessageDef>,
    #[serde(default)]
    pub enums: Vec<EnumDef>,
}

impl FileDef {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Default::default()
        }
    }

    pub fn message(mut self, message: MessageDef) -> Self {
        self.messages.push(message);
        self
    }

    pub fn enumeration(mut self, enumeration: EnumDef) -> Self {
        self.enums.push(enumeration);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageDef {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    /// Names of the tagged unions declared by this message, in declaration order.
    #[serde(default)]
    pub oneofs: Vec<String>,
    #[serde(default)]
    pub messages: Vec<MessageDef>,
    #[serde(default)]
    pub enums: Vec<EnumDef>,
}

impl MessageDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn oneof(mut self, name: impl Into<String>) -> Self {
        self.oneofs.push(name.into());
        self
    }

    pub fn nested(mut self, message: MessageDef) -> Self {
        self.messages.push(message);
        self
    }

    pub fn nested_enum(mut self, enumeration: EnumDef) -> Self {
        self.enums.push(enumeration);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    #[default]
    Optional,
    Repeated,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
    pub name: String,
    pub number: u32,
    #[serde(rename = "type")]
    pub kind: Kind,
    /// Referenced message or enum, for `message` and `enum` kinds.
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub label: Label,
    /// Key and value types when the field is a map. `kind` must be `message`.
    #[serde(default)]
    pub map: Option<MapDef>,
    /// The tagged union this field belongs to.
    #[serde(default)]
    pub oneof: Option<String>,
    /// Proto3 `optional`: explicit presence through a synthetic union.
    #[serde(default)]
    pub optional: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, number: u32, kind: Kind) -> Self {
        Self {
            name: name.into(),
            number,
            kind,
            type_name: None,
            label: Label::Optional,
            map: None,
            oneof: None,
            optional: false,
        }
    }

    pub fn message(name: impl Into<String>, number: u32, type_name: impl Into<String>) -> Self {
        Self::new(name, number, Kind::Message).type_name(type_name)
    }

    pub fn enumeration(name: impl Into<String>, number: u32, type_name: impl Into<String>) -> Self {
        Self::new(name, number, Kind::Enum).type_name(type_name)
    }

    pub fn map(name: impl Into<String>, number: u32, key: Kind, value: MapValueDef) -> Self {
        let mut field = Self::new(name, number, Kind::Message);
        field.map = Some(MapDef { key, value });
        field
    }

    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn repeated(mut self) -> Self {
        self.label = Label::Repeated;
        self
    }

    pub fn in_oneof(mut self, oneof: impl Into<String>) -> Self {
        self.oneof = Some(oneof.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapDef {
    pub key: Kind,
    pub value: MapValueDef,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapValueDef {
    #[serde(rename = "type")]
    pub kind: Kind,
    #[serde(default)]
    pub type_name: Option<String>,
}

impl MapValueDef {
    pub fn scalar(kind: Kind) -> Self {
        Self {
            kind,
            type_name: None,
        }
    }

    pub fn message(type_name: impl Into<String>) -> Self {
        Self {
            kind: Kind::Message,
            type_name: Some(type_name.into()),
        }
    }

    pub fn enumeration(type_name: impl Into<String>) -> Self {
        Self {
            kind: Kind::Enum,
            type_name: Some(type_name.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumDef {
    pub name: String,
    #[serde(default)]
    pub values: Vec<EnumValueDef>,
}

impl EnumDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    pub fn value(mut self, name: impl Into<String>, number: i32) -> Self {
        self.values.push(EnumValueDef {
            name: name.into(),
            number,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumValueDef {
    pub name: String,
    pub number: i32,
}
