//! Request middleware.
//!
//! Purpose: request lifecycle concerns that sit outside individual handlers,
//! currently trace identifier propagation and request logging.

pub mod trace;

pub use trace::Trace;
