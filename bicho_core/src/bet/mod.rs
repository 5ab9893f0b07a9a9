pub mod dto;
pub mod modality;
pub mod palpite;
pub mod storage;
pub mod store;
pub mod surpresinha;
