//! HTTP layer
//!
//! Everything between the board store and the network:
//! - **session**: in-memory access token and user
//! - **transport**: pluggable request sender (reqwest with a cookie jar)
//! - **single_flight**: de-duplication of concurrent token refreshes
//! - **client**: `ApiClient` with bearer auth, refresh-and-replay and error
//!   normalization

mod client;
mod session;
pub mod single_flight;
pub mod transport;

pub use client::{ApiClient, Auth, ResponseBody};
pub use session::Session;
pub use single_flight::SingleFlight;
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
