pub mod client;
pub mod config;
pub mod model;
pub mod parser;
pub mod report;
pub mod search;
pub mod shortlist;
pub mod storage;
pub mod utils;
