//! Shared identifier types for dnsfs.
//!
//! Every crate in the workspace speaks the same vocabulary: [`Ino`] for
//! filesystem inode numbers, [`Uid`]/[`Gid`] for ownership, and
//! [`RecordType`] for the DNS record type an engine instance is fixed to.

#[macro_use]
pub mod strong_type;

pub mod ids;
pub mod record_type;

pub use ids::{Gid, Ino, Uid};
pub use record_type::{RecordType, UnknownRecordType};
