pub mod keyspace;
pub mod sorted_set;
pub mod union_top;

pub use keyspace::{Keyspace, Value};
pub use sorted_set::{SortedSet, SortedSetCursor};
pub use union_top::{Reply, UnionTopRequest, zunion_top};
