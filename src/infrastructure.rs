pub mod files;
pub mod http;
pub mod logging;
