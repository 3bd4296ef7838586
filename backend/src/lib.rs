//! Speech portal library modules.
//!
//! Users register with email confirmation, log in, upload audio recordings
//! tagged with a language and browse only their own uploads. The crate is
//! laid out as a hexagon: `domain` owns the model, services and ports,
//! `inbound` adapts HTTP onto the driving ports and `outbound` implements
//! the driven ports.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(feature = "test-support")]
pub mod test_support;

pub use middleware::Trace;
