pub mod catalog;
pub mod dto;
pub mod selector;
