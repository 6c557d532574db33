pub mod frecency;
pub mod matching;
pub mod permutation;
pub mod query;
pub mod ranking;
pub mod record;
pub mod selector;

mod error;

pub use error::{Error, Result};
