pub mod ai;
pub mod api;
pub mod cli;
pub mod core;
pub mod intake;
pub mod openai;
