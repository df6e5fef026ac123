pub mod cli;
pub mod extract;
pub mod judge;
pub mod languages;
pub mod parse;
