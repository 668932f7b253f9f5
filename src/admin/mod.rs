pub mod commands;
pub mod score;
