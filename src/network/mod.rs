//! Network Module
//!
//! Device connection and the request/response transaction engine.
//!
//! ## Architecture
//! - One `Connection` per device, owning the TCP stream
//! - One `Transaction` per request, holding the connection lock throughout
//! - A fresh `StreamAccumulator` per transaction

mod accumulator;
mod connection;
mod transaction;

pub use accumulator::StreamAccumulator;
pub use connection::Connection;
pub use transaction::{Transaction, TransactionState};
