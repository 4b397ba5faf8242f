pub mod config;
pub mod generate;
pub mod list;
pub mod serve;
pub mod status;
