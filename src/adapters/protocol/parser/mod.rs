pub mod base_parser;
pub mod traits;

pub use base_parser::BaseParser;
pub use traits::*;
