//! Inbound adapters translating external requests into calls on the driving
//! port. Only HTTP exists today.

pub mod http;
