//! HTTP API for account management
//!
//! # Endpoints
//!
//! | Path | Required | Optional (default) |
//! |------|----------|--------------------|
//! | `/add` | `user` | `password` (= user), `days` (= 30) |
//! | `/trial` | `user` | `mins` (= 30) |
//! | `/renew` | `user` | `days` (= 30) |
//! | `/del` | `user` | |
//!
//! Every request must carry `auth=<key>`. A wrong key gets a 401; every
//! other outcome, failures included, is a 200 with a JSON envelope:
//!
//! ```json
//! {"status": "success", "data": {"domain": "...", "username": "...", "password": "...", "expired": "..."}}
//! {"status": "error", "message": "Failed to renew", "raw": "..."}
//! ```

pub mod params;
pub mod response;
pub mod router;

pub use params::QueryParams;
pub use response::{ApiError, ApiResponse};
pub use router::{router, serve, ServeError};
