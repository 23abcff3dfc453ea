pub mod error;
pub mod json_reply;
pub mod logger;
pub mod validation;
