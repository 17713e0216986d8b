pub mod build;
pub mod config;
pub mod grade;
pub mod rank;
