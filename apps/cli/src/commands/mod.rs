//! 命令定义和实现

pub mod center;
pub mod config;
pub mod demo;
pub mod r#move;
pub mod status;

pub use center::CenterCommand;
pub use config::ConfigCommand;
pub use demo::DemoCommand;
pub use r#move::MoveCommand;
pub use status::StatusCommand;
