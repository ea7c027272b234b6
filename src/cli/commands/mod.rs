mod command_result;
pub mod documents;
pub mod init;
pub mod position;

pub use command_result::*;
