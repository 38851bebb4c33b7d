pub mod array_heap;

pub use array_heap::{is_heap, make_heap, pop_heap, push_heap};
