//! Tee-Time Data Model
//!
//! The transport record returned by every tee-time endpoint and the
//! enumeration of upstream collections the client can load from.

mod record;
mod source;

pub use record::{RecordError, TeeTimeRecord};
#[cfg(test)]
pub(crate) use record::fixtures;
pub use source::{ParseSourceError, TeeTimeSource};
