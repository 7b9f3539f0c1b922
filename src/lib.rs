pub mod analyze;
pub mod classify;
pub mod cli;
pub mod error;
pub mod model;
pub mod module;
pub mod parsers;
pub mod render;
pub mod report;
pub mod tree;
