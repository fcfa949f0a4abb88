pub mod migration;
pub mod tables;
