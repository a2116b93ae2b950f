//! Shared value types: object identity, transforms, colors.

mod types;

pub use types::{Color, ColorParseError, ObjectId, Transform};
