//! Depth-first traversal of a message's present values.
//!
//! Every node is pushed before its children and popped after them, leaves
//! included. Fields come in declaration order, list elements by index and map
//! entries by ascending key.

use core::fmt::{self, Display};

use protolit_reflect::{DynamicMessage, FieldDescriptor, MapKey, ValueRef};

/// How a node was reached from its parent.
#[derive(Debug, Clone, PartialEq)]
pub enum Step<'a> {
    Root,
    Field(FieldDescriptor),
    ListIndex { field: FieldDescriptor, index: usize },
    MapEntry { field: FieldDescriptor, key: &'a MapKey },
}

impl Step<'_> {
    /// The field the node belongs to. For list elements and map entries this
    /// is the list or map field.
    pub fn field(&self) -> Option<&FieldDescriptor> {
        match self {
            Step::Root => None,
            Step::Field(field)
            | Step::ListIndex { field, .. }
            | Step::MapEntry { field, .. } => Some(field),
        }
    }

    /// Whether the node is an element of a list or a map.
    pub fn is_element(&self) -> bool {
        matches!(self, Step::ListIndex { .. } | Step::MapEntry { .. })
    }
}

impl Display for Step<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Root => f.write_str("(root)"),
            Step::Field(field) => f.write_str(field.full_name()),
            Step::ListIndex { field, index } => write!(f, "{}[{index}]", field.full_name()),
            Step::MapEntry { field, key } => write!(f, "{}[{key:?}]", field.full_name()),
        }
    }
}

pub trait Visitor<'a> {
    fn push(&mut self, step: &Step<'a>, value: ValueRef<'a>);
    fn pop(&mut self, step: &Step<'a>, value: ValueRef<'a>);
}

pub fn walk<'a, V: Visitor<'a>>(message: &'a DynamicMessage, visitor: &mut V) {
    visit(Step::Root, ValueRef::Message(message), visitor);
}

fn visit<'a, V: Visitor<'a>>(step: Step<'a>, value: ValueRef<'a>, visitor: &mut V) {
    visitor.push(&step, value);
    match value {
        ValueRef::Message(message) => {
            for (field, value) in message.present_fields() {
                visit(Step::Field(field), value.as_ref(), visitor);
            }
        }
        ValueRef::List(items) => {
            if let Some(field) = step.field() {
                for (index, item) in items.iter().enumerate() {
                    let step = Step::ListIndex {
                        field: field.clone(),
                        index,
                    };
                    visit(step, item.as_ref(), visitor);
                }
            }
        }
        ValueRef::Map(entries) => {
            if let Some(field) = step.field() {
                let mut entries: Vec<_> = entries.iter().collect();
                entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
                for (key, value) in entries {
                    let step = Step::MapEntry {
                        field: field.clone(),
                        key,
                    };
                    visit(step, value.as_ref(), visitor);
                }
            }
        }
        ValueRef::Enum(_) | ValueRef::Bytes(_) | ValueRef::String(_) | ValueRef::Scalar(_) => {}
    }
    visitor.pop(&step, value);
}
