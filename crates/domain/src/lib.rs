#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
mod error;
mod score;
mod service;
mod session_record;
mod user;

pub use config::*;
pub use error::*;
pub use score::*;
pub use service::*;
pub use session_record::*;
pub use user::*;
