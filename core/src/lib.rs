pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod judge;
pub mod language;
pub mod normalize;
pub mod parser;
pub mod prepare;
pub mod runner;
pub mod statement;
pub mod store;
