//! Content trees and how they are split into package documents.

mod element;
pub mod node_types;
mod splitter;

pub use element::{ContentElement, ContentMap, ContentValue, primary_type};
pub use node_types::{BoundaryType, is_boundary_type};
pub use splitter::{ContentPart, split};
