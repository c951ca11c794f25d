//! Loading, cleaning and summarizing the Sleep Health and Lifestyle survey.
//!
//! The dashboard binary renders the views produced here; everything in this
//! crate is usable without a UI.

pub mod config;
pub mod data;
pub mod error;
pub mod summary;

pub use data::cache::DatasetCache;
pub use data::loader::DataSource;
pub use data::model::{Dataset, ScalarType, Value};
pub use error::DataError;
