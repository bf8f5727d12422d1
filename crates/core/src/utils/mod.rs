pub mod parse_utils;

pub use parse_utils::*;
