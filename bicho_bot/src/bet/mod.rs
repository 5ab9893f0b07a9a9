pub mod callbacks;
pub mod dto;
pub mod handler;
pub mod session;
pub mod storage;
pub mod wizard;
