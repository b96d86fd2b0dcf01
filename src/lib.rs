pub mod api;
pub mod cli;
pub mod indices;
pub mod models;
pub mod output;
pub mod utils;
