pub mod common;
pub mod delete;
pub mod edit;
pub mod generate;
pub mod init;
pub mod list;
pub mod options;
pub mod regenerate;
pub mod show;
pub mod summary;
pub mod topics;
pub mod transfer;
pub mod validate;
