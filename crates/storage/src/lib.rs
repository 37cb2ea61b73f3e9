#![warn(clippy::pedantic)]

pub mod config;
pub mod log;
pub mod memory;
