pub mod acceptance;
pub mod entities;
pub mod use_cases;
