pub mod client;
pub mod error;

pub use client::XtractClient;
pub use error::XtractError;
