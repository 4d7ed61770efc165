//! Request middleware and extractors.
//!
//! - **`auth`** - Bearer-token authentication extractors and the role policy
//! - **`locale`** - Language negotiation (query > header > cookie > default)

pub mod auth;
pub mod locale;
