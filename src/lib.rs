pub mod config;
pub mod merge;
pub mod normalize;
pub mod table;
