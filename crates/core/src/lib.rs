pub mod account;
pub mod builder;
pub mod client;
pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod sink;
pub mod util;

pub type Result<T> = std::result::Result<T, error::Error>;
