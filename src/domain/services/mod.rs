//! Pure domain logic with no I/O.

mod reply_parser;

pub use reply_parser::*;
