pub mod dto;
pub mod machine;
