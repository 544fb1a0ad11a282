pub mod config;
pub mod engine;
pub mod error;
pub mod hierarchy;
pub mod models;
pub mod seed;
pub mod store;
pub mod util;
pub mod workbook;
