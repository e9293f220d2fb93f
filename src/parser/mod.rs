pub mod prize_parser;

pub use prize_parser::{ParsedBlock, PrizeBlockParser};
