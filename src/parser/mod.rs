pub mod offer_parser;

pub use offer_parser::{AmadeusParser, Parser};
