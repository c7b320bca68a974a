pub mod deletion;
pub mod listing;
pub mod upload;
