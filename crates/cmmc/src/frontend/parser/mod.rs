//! Parser module for C--

mod parser;

pub use parser::Parser;
