pub mod engine;
pub mod error;
pub mod fixture;
pub mod objects;
pub mod params;
pub mod service;
pub mod staging;
pub mod verify;

pub use error::ServiceError;
pub use fixture::TestFixture;
pub use service::{RunContext, SpadesService};
