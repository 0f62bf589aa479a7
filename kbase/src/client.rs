use lazy_static::lazy_static;
use tokio::time::Duration;

lazy_static! {
    static ref CLIENT: reqwest::Client = {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(20))
            .build()
            .expect("reqwest::Client::new()")
    };
}

/// Shared HTTP client. Calls are synchronous from the caller's point of
/// view and never retried; a hung service stalls the caller.
pub fn http_client() -> &'static reqwest::Client {
    &CLIENT
}
