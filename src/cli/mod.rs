pub mod args;
pub mod command;
pub mod config;
pub mod plot;
pub mod render;
pub mod table;
