//! Error taxonomy for the HTTP API.
//!
//! - **`types`** - The [`ApiError`] enum and constructors
//! - **`conversion`** - `IntoResponse` mapping to the JSON envelope
//!
//! Handlers return `Result<_, ApiError>` and map their own failures to the
//! taxonomy inline; anything that escapes as `Database`/`Internal` is logged
//! in full and surfaces to clients as a generic 500 message.

pub mod conversion;
pub mod types;

pub use types::ApiError;
