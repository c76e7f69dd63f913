pub mod logger;
pub mod logging;
