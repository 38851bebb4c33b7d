pub mod cursor;
pub mod vec_cursor;

pub use cursor::{SortedCursor, SourceError, WeightedSource};
pub use vec_cursor::VecCursor;
