pub mod bot_commands;
pub mod config;
pub mod dto;
pub mod money;
