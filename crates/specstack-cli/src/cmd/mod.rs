pub mod config;
pub mod init;
pub mod register;
pub mod select;
pub mod stacks;
pub mod targets;
pub mod update;
