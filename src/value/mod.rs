//! Typed value codec.
//!
//! Property values are written to `.content.xml` attributes as text with an
//! optional `{Type}` prefix and `[...]` array brackets, e.g. `{Long}55`,
//! `[v1,v2]` or `{Date}2010-09-05T15:10:20.000+02:00`. [`ValueConverter`]
//! produces this form from a [`Value`] and reads it back; [`DocViewProperty`]
//! is the parsed text form used when rewriting attributes in place.

mod converter;
mod docview;
mod types;

pub use converter::{PN_PRIVILEGES, ValueConverter, format_date, parse_date};
pub use docview::DocViewProperty;
pub use types::{PropertyType, Value};
