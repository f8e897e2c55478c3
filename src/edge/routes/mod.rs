//! Edge route handlers that are not proxied or static.

pub mod health;
