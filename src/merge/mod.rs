pub mod comparator;
pub mod error;
pub mod options;
pub mod top_k_merge;

pub use comparator::{Comparator, FrontierEntry};
pub use error::MergeError;
pub use options::{Direction, MergeOptions, TieBreak};
pub use top_k_merge::{Ranked, TopKMerge, merge_top_k};
