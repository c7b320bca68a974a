pub mod gateway;
pub mod presenters;
