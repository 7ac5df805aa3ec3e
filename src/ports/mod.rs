//! Port traits (hexagonal boundaries).

pub mod config_port;
pub mod data_port;
pub mod random_port;
pub mod report_port;
