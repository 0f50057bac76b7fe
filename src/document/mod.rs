//! Text document abstraction.
//!
//! The cell model only needs an immutable, line-indexed view of the
//! editor buffer plus the cursor selections. Positions are byte based.

pub mod position;
pub mod text;

pub use position::{Position, Range, Selection};
pub use text::{SourceText, TextDocument};
