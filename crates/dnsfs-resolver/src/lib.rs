//! DNS resolution layer for dnsfs.
//!
//! Uses `hickory-proto` for wire-format serialization/deserialization but
//! owns all query and response logic: a query is one RD-flagged standard
//! question, an exchange is one length-framed TCP round trip to a single
//! fixed resolver endpoint, and a response is consumed either as raw wire
//! bytes (leaf file content) or as a decoded [`AnswerSet`] (directory
//! listings).
//!
//! There is deliberately no retry, no fallback server, no EDNS negotiation
//! and no DNSSEC handling; callers needing fresher data re-invoke.

pub mod client;
pub mod error;
pub mod wire;

pub use client::DnsTcpClient;
pub use error::ResolveError;
pub use wire::{AnswerRecord, AnswerSet};
