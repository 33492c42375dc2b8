pub mod config;
pub mod drive;
pub mod reports;
pub mod shared;
