//! Immutable descriptors for messages, fields, unions and enums.
//!
//! Descriptors are handles into a shared [`DescriptorPool`]. Cloning a handle is
//! an `Arc` bump; two handles compare equal when they point at the same entry
//! of the same pool.

use core::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use indexmap::IndexMap;
use thiserror::Error;

use crate::defs::{EnumDef, FieldDef, FileDef, Label, MessageDef};
use crate::kind::{Cardinality, Kind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("duplicate type name: {name}")]
    DuplicateTypeName { name: String },
    #[error("duplicate field name `{name}` in {message}")]
    DuplicateFieldName { message: String, name: String },
    #[error("duplicate field number {number} in {message}")]
    DuplicateFieldNumber { message: String, number: u32 },
    #[error("duplicate enum value `{name}` in {enumeration}")]
    DuplicateEnumValue { enumeration: String, name: String },
    #[error("field {field} of kind {kind} requires a type name")]
    MissingTypeName { field: String, kind: Kind },
    #[error("field {field} of kind {kind} cannot reference a type")]
    UnexpectedTypeName { field: String, kind: Kind },
    #[error("unresolved type `{type_name}` referenced by {field}")]
    UnresolvedType { field: String, type_name: String },
    #[error("{field} expects a {expected} type but `{type_name}` is not one")]
    TypeMismatch {
        field: String,
        type_name: String,
        expected: Kind,
    },
    #[error("{kind} cannot be used as the key of map field {field}")]
    InvalidMapKey { field: String, kind: Kind },
    #[error("field {field} references undeclared oneof `{oneof}`")]
    UnknownOneof { field: String, oneof: String },
    #[error("{owner}: `{name}` is a Go keyword")]
    KeywordName { owner: String, name: String },
    #[error("invalid field {field}: {reason}")]
    InvalidField { field: String, reason: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeRef {
    Message(usize),
    Enum(usize),
}

#[derive(Debug, Clone, Copy)]
enum TypeSlot {
    Scalar(Kind),
    Enum(usize),
    Message(usize),
}

#[derive(Debug)]
struct PoolInner {
    messages: Vec<MessageInner>,
    enums: Vec<EnumInner>,
    names: IndexMap<String, TypeRef>,
}

#[derive(Debug)]
struct MessageInner {
    full_name: String,
    go_name: String,
    fields: Vec<FieldInner>,
    oneofs: Vec<OneofInner>,
    by_name: AHashMap<String, usize>,
    by_number: AHashMap<u32, usize>,
}

#[derive(Debug)]
struct FieldInner {
    name: String,
    full_name: String,
    number: u32,
    cardinality: Cardinality,
    slot: TypeSlot,
    map_key: Option<Kind>,
    oneof: Option<usize>,
    explicit_presence: bool,
}

#[derive(Debug)]
struct OneofInner {
    name: String,
    fields: Vec<usize>,
    synthetic: bool,
}

#[derive(Debug)]
struct EnumInner {
    full_name: String,
    go_name: String,
    value_prefix: String,
    values: Vec<(String, i32)>,
    by_number: AHashMap<i32, usize>,
}

/// A validated, immutable set of message and enum descriptors.
#[derive(Debug, Clone)]
pub struct DescriptorPool {
    inner: Arc<PoolInner>,
}

impl DescriptorPool {
    /// Build a pool from one or more files, resolving every type reference.
    pub fn new(files: impl IntoIterator<Item = FileDef>) -> Result<Self, DescriptorError> {
        let files: Vec<FileDef> = files.into_iter().collect();
        let inner = PoolBuilder::default().build(&files)?;
        tracing::debug!(
            files = files.len(),
            messages = inner.messages.len(),
            enums = inner.enums.len(),
            "built descriptor pool"
        );
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    pub fn from_file(file: FileDef) -> Result<Self, DescriptorError> {
        Self::new([file])
    }

    pub fn get_message_by_name(&self, full_name: &str) -> Option<MessageDescriptor> {
        match self.inner.names.get(full_name.trim_start_matches('.'))? {
            TypeRef::Message(index) => Some(MessageDescriptor {
                pool: self.clone(),
                index: *index,
            }),
            TypeRef::Enum(_) => None,
        }
    }

    pub fn get_enum_by_name(&self, full_name: &str) -> Option<EnumDescriptor> {
        match self.inner.names.get(full_name.trim_start_matches('.'))? {
            TypeRef::Enum(index) => Some(EnumDescriptor {
                pool: self.clone(),
                index: *index,
            }),
            TypeRef::Message(_) => None,
        }
    }

    /// All messages, nested ones included, in definition order.
    pub fn messages(&self) -> impl Iterator<Item = MessageDescriptor> + '_ {
        (0..self.inner.messages.len()).map(|index| MessageDescriptor {
            pool: self.clone(),
            index,
        })
    }

    fn same_pool(&self, other: &DescriptorPool) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[derive(Clone)]
pub struct MessageDescriptor {
    pool: DescriptorPool,
    index: usize,
}

impl MessageDescriptor {
    fn inner(&self) -> &MessageInner {
        &self.pool.inner.messages[self.index]
    }

    pub fn pool(&self) -> &DescriptorPool {
        &self.pool
    }

    /// Fully qualified name, e.g. `hotstuff.Block` or `pkg.Outer.Inner`.
    pub fn full_name(&self) -> &str {
        &self.inner().full_name
    }

    pub fn name(&self) -> &str {
        let full_name = self.full_name();
        full_name.rsplit('.').next().unwrap_or(full_name)
    }

    /// The package-qualified Go identifier of the generated struct. Nesting
    /// is flattened with underscores: `pkg.Outer.Inner` is `pkg.Outer_Inner`.
    pub fn go_name(&self) -> &str {
        &self.inner().go_name
    }

    /// The package or enclosing message this message is declared in.
    pub fn parent_name(&self) -> &str {
        parent_of(self.full_name())
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = FieldDescriptor> + '_ {
        (0..self.inner().fields.len()).map(|index| FieldDescriptor {
            message: self.clone(),
            index,
        })
    }

    pub fn get_field_by_name(&self, name: &str) -> Option<FieldDescriptor> {
        let index = *self.inner().by_name.get(name)?;
        Some(FieldDescriptor {
            message: self.clone(),
            index,
        })
    }

    pub fn get_field(&self, number: u32) -> Option<FieldDescriptor> {
        let index = *self.inner().by_number.get(&number)?;
        Some(FieldDescriptor {
            message: self.clone(),
            index,
        })
    }

    pub fn oneofs(&self) -> impl ExactSizeIterator<Item = OneofDescriptor> + '_ {
        (0..self.inner().oneofs.len()).map(|index| OneofDescriptor {
            message: self.clone(),
            index,
        })
    }
}

impl PartialEq for MessageDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.pool.same_pool(&other.pool) && self.index == other.index
    }
}

impl Eq for MessageDescriptor {}

impl fmt::Debug for MessageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MessageDescriptor")
            .field(&self.full_name())
            .finish()
    }
}

/// The resolved type of one value of a field: the singular value, one list
/// element, or one map value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Scalar(Kind),
    Enum(EnumDescriptor),
    Message(MessageDescriptor),
}

impl FieldType {
    pub fn kind(&self) -> Kind {
        match self {
            FieldType::Scalar(kind) => *kind,
            FieldType::Enum(_) => Kind::Enum,
            FieldType::Message(_) => Kind::Message,
        }
    }

    /// Go spelling of the type as generated code declares it.
    pub fn go_type(&self) -> String {
        match self {
            FieldType::Scalar(kind) => kind.go_type().unwrap_or_else(|| kind.name()).to_string(),
            FieldType::Enum(enumeration) => enumeration.go_name().to_string(),
            FieldType::Message(message) => format!("*{}", message.go_name()),
        }
    }

    pub fn as_enum(&self) -> Option<&EnumDescriptor> {
        match self {
            FieldType::Enum(enumeration) => Some(enumeration),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&MessageDescriptor> {
        match self {
            FieldType::Message(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct FieldDescriptor {
    message: MessageDescriptor,
    index: usize,
}

impl FieldDescriptor {
    fn inner(&self) -> &FieldInner {
        &self.message.inner().fields[self.index]
    }

    /// The message declaring this field.
    pub fn containing_message(&self) -> &MessageDescriptor {
        &self.message
    }

    pub fn name(&self) -> &str {
        &self.inner().name
    }

    /// `<message full name>.<field name>`.
    pub fn full_name(&self) -> &str {
        &self.inner().full_name
    }

    pub fn number(&self) -> u32 {
        self.inner().number
    }

    pub fn cardinality(&self) -> Cardinality {
        self.inner().cardinality
    }

    pub fn is_list(&self) -> bool {
        self.cardinality() == Cardinality::Repeated
    }

    pub fn is_map(&self) -> bool {
        self.cardinality() == Cardinality::Map
    }

    /// The field's declared kind. Map fields report [`Kind::Message`], as their
    /// entries are messages on the wire.
    pub fn kind(&self) -> Kind {
        if self.is_map() {
            Kind::Message
        } else {
            self.field_type().kind()
        }
    }

    /// Type of one value: the singular value, a list element or a map value.
    pub fn field_type(&self) -> FieldType {
        let pool = &self.message.pool;
        match self.inner().slot {
            TypeSlot::Scalar(kind) => FieldType::Scalar(kind),
            TypeSlot::Enum(index) => FieldType::Enum(EnumDescriptor {
                pool: pool.clone(),
                index,
            }),
            TypeSlot::Message(index) => FieldType::Message(MessageDescriptor {
                pool: pool.clone(),
                index,
            }),
        }
    }

    pub fn map_key_kind(&self) -> Option<Kind> {
        self.inner().map_key
    }

    /// The union this field belongs to, synthetic ones included.
    pub fn containing_oneof(&self) -> Option<OneofDescriptor> {
        let index = self.inner().oneof?;
        Some(OneofDescriptor {
            message: self.message.clone(),
            index,
        })
    }

    /// The declared (non-synthetic) union this field belongs to.
    pub fn real_oneof(&self) -> Option<OneofDescriptor> {
        self.containing_oneof().filter(|oneof| !oneof.is_synthetic())
    }

    /// Whether set-ness is tracked apart from the value, so a default value
    /// still counts as present once set.
    pub fn has_explicit_presence(&self) -> bool {
        self.inner().explicit_presence
    }
}

impl PartialEq for FieldDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message && self.index == other.index
    }
}

impl Eq for FieldDescriptor {}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldDescriptor")
            .field(&self.full_name())
            .finish()
    }
}

#[derive(Clone)]
pub struct OneofDescriptor {
    message: MessageDescriptor,
    index: usize,
}

impl OneofDescriptor {
    fn inner(&self) -> &OneofInner {
        &self.message.inner().oneofs[self.index]
    }

    pub fn name(&self) -> &str {
        &self.inner().name
    }

    /// Synthetic unions back proto3 `optional` fields and are never rendered.
    pub fn is_synthetic(&self) -> bool {
        self.inner().synthetic
    }

    pub fn fields(&self) -> impl ExactSizeIterator<Item = FieldDescriptor> + '_ {
        self.inner().fields.iter().map(|&index| FieldDescriptor {
            message: self.message.clone(),
            index,
        })
    }
}

impl PartialEq for OneofDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message && self.index == other.index
    }
}

impl Eq for OneofDescriptor {}

impl fmt::Debug for OneofDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OneofDescriptor").field(&self.name()).finish()
    }
}

#[derive(Clone)]
pub struct EnumDescriptor {
    pool: DescriptorPool,
    index: usize,
}

impl EnumDescriptor {
    fn inner(&self) -> &EnumInner {
        &self.pool.inner.enums[self.index]
    }

    pub fn full_name(&self) -> &str {
        &self.inner().full_name
    }

    pub fn name(&self) -> &str {
        let full_name = self.full_name();
        full_name.rsplit('.').next().unwrap_or(full_name)
    }

    /// The package-qualified Go type name, flattened like
    /// [`MessageDescriptor::go_name`].
    pub fn go_name(&self) -> &str {
        &self.inner().go_name
    }

    /// The Go constant for a value symbol. Top-level enums prefix constants
    /// with their own name, nested ones with the enclosing message's.
    pub fn go_constant(&self, symbol: &str) -> String {
        format!("{}_{symbol}", self.inner().value_prefix)
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = EnumValue<'_>> + '_ {
        self.inner()
            .values
            .iter()
            .map(|(name, number)| EnumValue { name, number: *number })
    }

    /// Look up a value by number. With aliases, the first declared name wins.
    pub fn value_by_number(&self, number: i32) -> Option<EnumValue<'_>> {
        let index = *self.inner().by_number.get(&number)?;
        let (name, number) = &self.inner().values[index];
        Some(EnumValue {
            name,
            number: *number,
        })
    }

    pub fn value_by_name(&self, name: &str) -> Option<EnumValue<'_>> {
        self.values().find(|value| value.name == name)
    }
}

impl PartialEq for EnumDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.pool.same_pool(&other.pool) && self.index == other.index
    }
}

impl Eq for EnumDescriptor {}

impl fmt::Debug for EnumDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EnumDescriptor")
            .field(&self.full_name())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValue<'a> {
    pub name: &'a str,
    pub number: i32,
}

fn parent_of(full_name: &str) -> &str {
    match full_name.rfind('.') {
        Some(dot) => &full_name[..dot],
        None => "",
    }
}

/// `a.pkg.Outer.Inner` in package `a.pkg` becomes `pkg.Outer_Inner`: Go
/// code refers to the type through the last package segment.
fn go_ident(package: &str, full_name: &str) -> String {
    let local = if package.is_empty() {
        full_name
    } else {
        full_name
            .strip_prefix(package)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(full_name)
    };
    let qualifier = package.rsplit('.').next().unwrap_or_default();
    qualify(qualifier, &local.replace('.', "_"))
}

const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough", "for",
    "func", "go", "goto", "if", "import", "interface", "map", "package", "range", "return", "select",
    "struct", "switch", "type", "var",
];

/// Names written verbatim into the literal must not be Go keywords.
fn check_not_keyword(owner: &str, name: &str) -> Result<(), DescriptorError> {
    if GO_KEYWORDS.contains(&name) {
        return Err(DescriptorError::KeywordName {
            owner: owner.to_string(),
            name: name.to_string(),
        });
    }
    Ok(())
}

fn check_go_ident(full_name: &str, go_name: &str) -> Result<(), DescriptorError> {
    go_name
        .split('.')
        .try_for_each(|segment| check_not_keyword(full_name, segment))
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}.{name}")
    }
}

#[derive(Default)]
struct PoolBuilder<'d> {
    names: IndexMap<String, TypeRef>,
    message_defs: Vec<Registered<'d, MessageDef>>,
    enum_defs: Vec<Registered<'d, EnumDef>>,
}

/// A definition with the names it was registered under.
struct Registered<'d, T> {
    full_name: String,
    go_name: String,
    /// Go constant prefix, used for enums only.
    value_prefix: String,
    def: &'d T,
}

impl<'d> PoolBuilder<'d> {
    fn build(mut self, files: &'d [FileDef]) -> Result<PoolInner, DescriptorError> {
        for file in files {
            for message in &file.messages {
                self.register_message(&file.package, &file.package, message)?;
            }
            for enumeration in &file.enums {
                self.register_enum(&file.package, &file.package, enumeration)?;
            }
        }

        let enums = self
            .enum_defs
            .iter()
            .map(build_enum)
            .collect::<Result<Vec<_>, _>>()?;
        let messages = self
            .message_defs
            .iter()
            .map(|registered| self.build_message(registered))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PoolInner {
            messages,
            enums,
            names: self.names,
        })
    }

    fn register(&mut self, full_name: String, type_ref: TypeRef) -> Result<(), DescriptorError> {
        if self.names.contains_key(&full_name) {
            return Err(DescriptorError::DuplicateTypeName { name: full_name });
        }
        self.names.insert(full_name, type_ref);
        Ok(())
    }

    fn register_message(
        &mut self,
        package: &str,
        scope: &str,
        def: &'d MessageDef,
    ) -> Result<(), DescriptorError> {
        let full_name = qualify(scope, &def.name);
        self.register(full_name.clone(), TypeRef::Message(self.message_defs.len()))?;
        let go_name = go_ident(package, &full_name);
        check_go_ident(&full_name, &go_name)?;
        self.message_defs.push(Registered {
            go_name,
            full_name: full_name.clone(),
            value_prefix: String::new(),
            def,
        });
        for nested in &def.messages {
            self.register_message(package, &full_name, nested)?;
        }
        for nested in &def.enums {
            self.register_enum(package, &full_name, nested)?;
        }
        Ok(())
    }

    fn register_enum(&mut self, package: &str, scope: &str, def: &'d EnumDef) -> Result<(), DescriptorError> {
        let full_name = qualify(scope, &def.name);
        self.register(full_name.clone(), TypeRef::Enum(self.enum_defs.len()))?;
        let go_name = go_ident(package, &full_name);
        check_go_ident(&full_name, &go_name)?;
        let value_prefix = if scope == package {
            go_name.clone()
        } else {
            go_ident(package, scope)
        };
        self.enum_defs.push(Registered {
            full_name,
            go_name,
            value_prefix,
            def,
        });
        Ok(())
    }

    /// Resolve `name` from inside `scope`, walking outwards one level at a
    /// time. A leading dot makes the name absolute.
    fn resolve(&self, scope: &str, name: &str) -> Option<TypeRef> {
        if let Some(absolute) = name.strip_prefix('.') {
            return self.names.get(absolute).copied();
        }
        let mut scope = scope;
        loop {
            if let Some(found) = self.names.get(&qualify(scope, name)) {
                return Some(*found);
            }
            if scope.is_empty() {
                return None;
            }
            scope = parent_of(scope);
        }
    }

    fn build_message(&self, registered: &Registered<'d, MessageDef>) -> Result<MessageInner, DescriptorError> {
        let full_name = registered.full_name.as_str();
        let def = registered.def;
        let mut oneofs: Vec<OneofInner> = def
            .oneofs
            .iter()
            .map(|name| OneofInner {
                name: name.clone(),
                fields: Vec::new(),
                synthetic: false,
            })
            .collect();
        let mut fields = Vec::with_capacity(def.fields.len());
        let mut by_name = AHashMap::new();
        let mut by_number = AHashMap::new();

        for oneof in &def.oneofs {
            check_not_keyword(full_name, oneof)?;
        }
        for (index, field) in def.fields.iter().enumerate() {
            let field_name = format!("{full_name}.{}", field.name);
            check_not_keyword(&field_name, &field.name)?;
            if by_name.insert(field.name.clone(), index).is_some() {
                return Err(DescriptorError::DuplicateFieldName {
                    message: full_name.to_string(),
                    name: field.name.clone(),
                });
            }
            if by_number.insert(field.number, index).is_some() {
                return Err(DescriptorError::DuplicateFieldNumber {
                    message: full_name.to_string(),
                    number: field.number,
                });
            }
            if field.number == 0 {
                return Err(invalid(&field_name, "field numbers start at 1"));
            }

            let (cardinality, slot, map_key) = self.field_shape(full_name, &field_name, field)?;

            let oneof = match (&field.oneof, field.optional) {
                (Some(_), true) => {
                    return Err(invalid(&field_name, "a oneof member cannot also be optional"));
                }
                (Some(_), false) if cardinality != Cardinality::Singular => {
                    return Err(invalid(&field_name, "oneof members must be singular"));
                }
                (Some(oneof), false) => {
                    let Some(position) = oneofs.iter().position(|o| !o.synthetic && &o.name == oneof)
                    else {
                        return Err(DescriptorError::UnknownOneof {
                            field: field_name,
                            oneof: oneof.clone(),
                        });
                    };
                    oneofs[position].fields.push(index);
                    Some(position)
                }
                (None, true) if cardinality != Cardinality::Singular => {
                    return Err(invalid(&field_name, "only singular fields can be optional"));
                }
                (None, true) => {
                    oneofs.push(OneofInner {
                        name: format!("_{}", field.name),
                        fields: vec![index],
                        synthetic: true,
                    });
                    Some(oneofs.len() - 1)
                }
                (None, false) => None,
            };

            let explicit_presence = cardinality == Cardinality::Singular
                && (oneof.is_some() || matches!(slot, TypeSlot::Message(_)));

            fields.push(FieldInner {
                name: field.name.clone(),
                full_name: field_name,
                number: field.number,
                cardinality,
                slot,
                map_key,
                oneof,
                explicit_presence,
            });
        }

        Ok(MessageInner {
            full_name: full_name.to_string(),
            go_name: registered.go_name.clone(),
            fields,
            oneofs,
            by_name,
            by_number,
        })
    }

    fn field_shape(
        &self,
        scope: &str,
        field_name: &str,
        field: &FieldDef,
    ) -> Result<(Cardinality, TypeSlot, Option<Kind>), DescriptorError> {
        let Some(map) = &field.map else {
            let cardinality = match field.label {
                Label::Optional => Cardinality::Singular,
                Label::Repeated => Cardinality::Repeated,
            };
            let slot = self.type_slot(scope, field_name, field.kind, field.type_name.as_deref())?;
            return Ok((cardinality, slot, None));
        };

        if field.kind != Kind::Message {
            return Err(invalid(field_name, "map fields must have type message"));
        }
        if field.type_name.is_some() {
            return Err(DescriptorError::UnexpectedTypeName {
                field: field_name.to_string(),
                kind: field.kind,
            });
        }
        if !map.key.is_valid_map_key() {
            return Err(DescriptorError::InvalidMapKey {
                field: field_name.to_string(),
                kind: map.key,
            });
        }
        let slot = self.type_slot(scope, field_name, map.value.kind, map.value.type_name.as_deref())?;
        Ok((Cardinality::Map, slot, Some(map.key)))
    }

    fn type_slot(
        &self,
        scope: &str,
        field_name: &str,
        kind: Kind,
        type_name: Option<&str>,
    ) -> Result<TypeSlot, DescriptorError> {
        match (kind.is_named(), type_name) {
            (false, None) => Ok(TypeSlot::Scalar(kind)),
            (false, Some(_)) => Err(DescriptorError::UnexpectedTypeName {
                field: field_name.to_string(),
                kind,
            }),
            (true, None) => Err(DescriptorError::MissingTypeName {
                field: field_name.to_string(),
                kind,
            }),
            (true, Some(type_name)) => {
                let Some(found) = self.resolve(scope, type_name) else {
                    return Err(DescriptorError::UnresolvedType {
                        field: field_name.to_string(),
                        type_name: type_name.to_string(),
                    });
                };
                match (kind, found) {
                    (Kind::Message, TypeRef::Message(index)) => Ok(TypeSlot::Message(index)),
                    (Kind::Enum, TypeRef::Enum(index)) => Ok(TypeSlot::Enum(index)),
                    _ => Err(DescriptorError::TypeMismatch {
                        field: field_name.to_string(),
                        type_name: type_name.to_string(),
                        expected: kind,
                    }),
                }
            }
        }
    }
}

fn build_enum(registered: &Registered<'_, EnumDef>) -> Result<EnumInner, DescriptorError> {
    let full_name = registered.full_name.as_str();
    let def = registered.def;
    let mut values = Vec::with_capacity(def.values.len());
    let mut by_number = AHashMap::new();
    for value in &def.values {
        if values.iter().any(|(name, _)| name == &value.name) {
            return Err(DescriptorError::DuplicateEnumValue {
                enumeration: full_name.to_string(),
                name: value.name.clone(),
            });
        }
        by_number.entry(value.number).or_insert(values.len());
        values.push((value.name.clone(), value.number));
    }
    Ok(EnumInner {
        full_name: full_name.to_string(),
        go_name: registered.go_name.clone(),
        value_prefix: registered.value_prefix.clone(),
        values,
        by_number,
    })
}

fn invalid(field: &str, reason: &'static str) -> DescriptorError {
    DescriptorError::InvalidField {
        field: field.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::{EnumDef, FieldDef, FileDef, MapValueDef, MessageDef};

    fn pool() -> DescriptorPool {
        DescriptorPool::from_file(
            FileDef::new("pkg")
                .enumeration(EnumDef::new("Color").value("RED", 0).value("GREEN", 1).value("VERDE", 1))
                .message(
                    MessageDef::new("Outer")
                        .oneof("choice")
                        .field(FieldDef::message("inner", 1, "Inner"))
                        .field(FieldDef::new("id", 2, Kind::Uint32).in_oneof("choice"))
                        .field(FieldDef::new("name", 3, Kind::String).in_oneof("choice"))
                        .field(FieldDef::new("note", 4, Kind::String).optional())
                        .field(FieldDef::map("labels", 5, Kind::String, MapValueDef::enumeration("Color")))
                        .nested(MessageDef::new("Inner").field(FieldDef::enumeration("color", 1, "Color"))),
                ),
        )
        .unwrap()
    }

    #[test]
    fn test_nested_names() {
        let pool = pool();
        let inner = pool.get_message_by_name("pkg.Outer.Inner").unwrap();
        assert_eq!(inner.name(), "Inner");
        assert_eq!(inner.parent_name(), "pkg.Outer");
        let color = inner.get_field_by_name("color").unwrap();
        assert_eq!(color.full_name(), "pkg.Outer.Inner.color");
        assert_eq!(color.field_type().as_enum().unwrap().full_name(), "pkg.Color");
    }

    #[test]
    fn test_go_names_flatten_nesting() {
        let pool = DescriptorPool::from_file(
            FileDef::new("a.b")
                .enumeration(EnumDef::new("Level").value("LOW", 0))
                .message(
                    MessageDef::new("Outer")
                        .nested(MessageDef::new("Inner"))
                        .nested_enum(EnumDef::new("Mode").value("FAST", 0)),
                ),
        )
        .unwrap();
        let inner = pool.get_message_by_name("a.b.Outer.Inner").unwrap();
        assert_eq!(inner.go_name(), "b.Outer_Inner");
        let outer = pool.get_message_by_name("a.b.Outer").unwrap();
        assert_eq!(outer.go_name(), "b.Outer");
        let mode = pool.get_enum_by_name("a.b.Outer.Mode").unwrap();
        assert_eq!(mode.go_name(), "b.Outer_Mode");
        assert_eq!(mode.go_constant("FAST"), "b.Outer_FAST");
        let level = pool.get_enum_by_name("a.b.Level").unwrap();
        assert_eq!(level.go_constant("LOW"), "b.Level_LOW");
    }

    #[test]
    fn test_keyword_field_name() {
        let err = DescriptorPool::from_file(
            FileDef::new("pkg").message(MessageDef::new("A").field(FieldDef::new("type", 1, Kind::Int32))),
        )
        .unwrap_err();
        assert_eq!(
            err,
            DescriptorError::KeywordName {
                owner: "pkg.A.type".to_string(),
                name: "type".to_string(),
            }
        );
    }

    #[test]
    fn test_keyword_oneof_and_type_names() {
        let err = DescriptorPool::from_file(FileDef::new("pkg").message(
            MessageDef::new("A")
                .oneof("select")
                .field(FieldDef::new("a", 1, Kind::Bool).in_oneof("select")),
        ))
        .unwrap_err();
        assert!(matches!(err, DescriptorError::KeywordName { ref name, .. } if name == "select"));

        let err = DescriptorPool::from_file(FileDef::new("pkg").message(MessageDef::new("map"))).unwrap_err();
        assert!(matches!(err, DescriptorError::KeywordName { ref name, .. } if name == "map"));

        let err = DescriptorPool::from_file(FileDef::new("a.go").message(MessageDef::new("M"))).unwrap_err();
        assert!(matches!(err, DescriptorError::KeywordName { ref name, .. } if name == "go"));
    }

    #[test]
    fn test_keywords_inside_flattened_names_are_fine() {
        let pool = DescriptorPool::from_file(
            FileDef::new("pkg").message(
                MessageDef::new("Outer")
                    .nested(MessageDef::new("type"))
                    .field(FieldDef::new("range_end", 1, Kind::Int32)),
            ),
        )
        .unwrap();
        let nested = pool.get_message_by_name("pkg.Outer.type").unwrap();
        assert_eq!(nested.go_name(), "pkg.Outer_type");
    }

    #[test]
    fn test_relative_reference_resolves_to_nested_message() {
        let pool = pool();
        let outer = pool.get_message_by_name("pkg.Outer").unwrap();
        let inner = outer.get_field_by_name("inner").unwrap();
        assert_eq!(
            inner.field_type().as_message().unwrap().full_name(),
            "pkg.Outer.Inner"
        );
        assert!(inner.has_explicit_presence());
    }

    #[test]
    fn test_oneof_membership() {
        let pool = pool();
        let outer = pool.get_message_by_name("pkg.Outer").unwrap();
        let id = outer.get_field_by_name("id").unwrap();
        let oneof = id.real_oneof().unwrap();
        assert_eq!(oneof.name(), "choice");
        assert_eq!(oneof.fields().map(|f| f.number()).collect::<Vec<_>>(), vec![2, 3]);
        assert!(id.has_explicit_presence());
    }

    #[test]
    fn test_optional_field_gets_synthetic_oneof() {
        let pool = pool();
        let outer = pool.get_message_by_name("pkg.Outer").unwrap();
        let note = outer.get_field_by_name("note").unwrap();
        let oneof = note.containing_oneof().unwrap();
        assert!(oneof.is_synthetic());
        assert_eq!(oneof.name(), "_note");
        assert!(note.real_oneof().is_none());
        assert!(note.has_explicit_presence());
    }

    #[test]
    fn test_map_field_shape() {
        let pool = pool();
        let outer = pool.get_message_by_name("pkg.Outer").unwrap();
        let labels = outer.get_field_by_name("labels").unwrap();
        assert!(labels.is_map());
        assert_eq!(labels.kind(), Kind::Message);
        assert_eq!(labels.map_key_kind(), Some(Kind::String));
        assert_eq!(labels.field_type().go_type(), "pkg.Color");
        assert!(!labels.has_explicit_presence());
    }

    #[test]
    fn test_enum_alias_first_name_wins() {
        let pool = pool();
        let color = pool.get_enum_by_name("pkg.Color").unwrap();
        assert_eq!(color.value_by_number(1).unwrap().name, "GREEN");
        assert_eq!(color.value_by_name("VERDE").unwrap().number, 1);
        assert!(color.value_by_number(7).is_none());
    }

    #[test]
    fn test_unresolved_type() {
        let err = DescriptorPool::from_file(
            FileDef::new("pkg").message(MessageDef::new("A").field(FieldDef::message("b", 1, "B"))),
        )
        .unwrap_err();
        assert_eq!(
            err,
            DescriptorError::UnresolvedType {
                field: "pkg.A.b".to_string(),
                type_name: "B".to_string(),
            }
        );
    }

    #[test]
    fn test_type_mismatch() {
        let err = DescriptorPool::from_file(
            FileDef::new("pkg")
                .enumeration(EnumDef::new("E").value("ZERO", 0))
                .message(MessageDef::new("A").field(FieldDef::message("e", 1, "E"))),
        )
        .unwrap_err();
        assert!(matches!(err, DescriptorError::TypeMismatch { expected: Kind::Message, .. }));
    }

    #[test]
    fn test_duplicate_field_number() {
        let err = DescriptorPool::from_file(
            FileDef::new("pkg").message(
                MessageDef::new("A")
                    .field(FieldDef::new("a", 1, Kind::Bool))
                    .field(FieldDef::new("b", 1, Kind::Bool)),
            ),
        )
        .unwrap_err();
        assert_eq!(
            err,
            DescriptorError::DuplicateFieldNumber {
                message: "pkg.A".to_string(),
                number: 1,
            }
        );
    }

    #[test]
    fn test_invalid_map_key() {
        let err = DescriptorPool::from_file(FileDef::new("pkg").message(
            MessageDef::new("A").field(FieldDef::map("m", 1, Kind::Double, MapValueDef::scalar(Kind::Bool))),
        ))
        .unwrap_err();
        assert_eq!(
            err,
            DescriptorError::InvalidMapKey {
                field: "pkg.A.m".to_string(),
                kind: Kind::Double,
            }
        );
    }

    #[test]
    fn test_unknown_oneof() {
        let err = DescriptorPool::from_file(FileDef::new("pkg").message(
            MessageDef::new("A").field(FieldDef::new("a", 1, Kind::Bool).in_oneof("missing")),
        ))
        .unwrap_err();
        assert!(matches!(err, DescriptorError::UnknownOneof { .. }));
    }

    #[test]
    fn test_duplicate_type_name() {
        let err = DescriptorPool::new([
            FileDef::new("pkg").message(MessageDef::new("A")),
            FileDef::new("pkg").message(MessageDef::new("A")),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            DescriptorError::DuplicateTypeName {
                name: "pkg.A".to_string()
            }
        );
    }

    #[test]
    fn test_handles_compare_by_pool_identity() {
        let a = pool();
        let b = pool();
        assert_eq!(
            a.get_message_by_name("pkg.Outer"),
            a.get_message_by_name(".pkg.Outer")
        );
        assert_ne!(a.get_message_by_name("pkg.Outer"), b.get_message_by_name("pkg.Outer"));
    }
}
