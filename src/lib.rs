pub mod config;
pub mod heap;
pub mod merge;
pub mod source;
pub mod store;
