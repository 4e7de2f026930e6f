//! XML escaping helpers used by the document writer and metadata templates.

mod escape;

pub use escape::{escape_attribute, escape_text};
