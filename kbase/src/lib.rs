pub mod client;
pub mod conf;
pub mod error;
pub mod handle;
pub mod md5sum;
mod rpc;
pub mod shock;
pub mod workspace;

pub use error::{Error, Result};
