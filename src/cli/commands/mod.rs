mod command_result;
pub mod context;
pub mod generate;
pub mod init;
pub mod variants;

pub use command_result::*;
