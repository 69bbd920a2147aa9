//! Render dynamic protobuf messages as Go composite literals.
//!
//! A message is walked depth-first and every present field is written as Go
//! source. The raw text then goes through a canonicalizer (by default
//! [`GoLiteralFormatter`]) so the result reads like gofmt output.
//!
//! ```
//! use protolit::render;
//! use protolit_reflect::{DescriptorPool, DynamicMessage, FieldDef, FileDef, Kind, MessageDef};
//!
//! let pool = DescriptorPool::from_file(
//!     FileDef::new("demo").message(
//!         MessageDef::new("Point")
//!             .field(FieldDef::new("X", 1, Kind::Int32))
//!             .field(FieldDef::new("Label", 2, Kind::String)),
//!     ),
//! )
//! .unwrap();
//! let point = DynamicMessage::new(pool.get_message_by_name("demo.Point").unwrap())
//!     .with_field("X", 3i32)
//!     .unwrap()
//!     .with_field("Label", "origin")
//!     .unwrap();
//! assert_eq!(render(&point), "&demo.Point{\n\tX:     3,\n\tLabel: \"origin\",\n}\n");
//! ```

mod literal;
mod nesting;
mod render;
pub mod walk;

pub use protolit_fmt::{Canonicalize, FormatConfig, GoLiteralFormatter, IndentStyle, SyntaxError};
pub use render::{RenderError, Renderer};

use protolit_reflect::DynamicMessage;

/// Render with the default canonicalizer. `None` renders as an empty string.
///
/// # Panics
///
/// Panics when the canonicalizer rejects the generated text, which only
/// happens if the renderer itself is broken.
pub fn render<'a>(message: impl Into<Option<&'a DynamicMessage>>) -> String {
    Renderer::new().render(message)
}

pub fn try_render<'a>(
    message: impl Into<Option<&'a DynamicMessage>>,
) -> Result<String, RenderError> {
    Renderer::new().try_render(message)
}
