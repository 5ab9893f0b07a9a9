pub mod bet;
pub mod checkout;
pub mod error;
pub mod flow;
pub mod helpers;
pub mod lottery;
