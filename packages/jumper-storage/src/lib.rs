pub mod codec;
pub mod filters;
pub mod reader;
pub mod store;

mod error;

pub use error::{Error, Result};
pub use filters::Filters;
pub use reader::RecordReader;
pub use store::{CleanReport, StoreStats};
