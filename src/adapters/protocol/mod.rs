pub mod constants;
pub mod dto;
pub mod list_offsets;
pub mod parser;

pub use list_offsets::ListOffsetsCodec;
