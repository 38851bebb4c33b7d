pub mod config;
pub mod dataset;

pub use config::{Config, load_config};
pub use dataset::load_dataset;
