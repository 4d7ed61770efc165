//! HTTP route configuration.
//!
//! - **`router`** - Router assembly, layers, health/index/fallback handlers
//! - **`api_routes`** - The `/api/*` resource routes

pub mod api_routes;
pub mod router;

pub use router::create_router;
