pub mod add;
pub mod dispatch;
pub mod init;
pub mod list;
pub mod schema;
pub mod serve;
pub mod submit;
