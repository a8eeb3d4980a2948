//! dnsfs-fuse: the DNS-namespace filesystem engine.
//!
//! This crate maps the DNS namespace onto a read-only filesystem tree:
//! looking up a name under the mount root materializes it as a directory
//! (`example.com`) or, with a trailing dot, as a file whose content is the
//! raw DNS wire response (`example.com.`). Listing a directory resolves the
//! name live and shows the answer records as entries.
//!
//! # Architecture
//!
//! - **[`registry`]** - `NameRegistry`, the bijection between inode numbers
//!   and DNS names, plus the `NodeKind` classification every operation
//!   consumes.
//!
//! - **[`types`]** - filesystem-facing types (`FileAttr`, `FuseEntryParam`,
//!   `OpenFlags`, inode constants) that abstract the FUSE kernel protocol.
//!
//! - **[`reply`]** - reply types for each operation (`ReplyEntry`,
//!   `ReplyData`, `ReplyDirectory`, ...).
//!
//! - **[`ops`]** - the `FuseOps` trait the kernel adapter drives. Default
//!   implementations return `ENOSYS`.
//!
//! - **[`filesystem`]** - `DnsFs`, the engine implementing `FuseOps` over
//!   an `Arc<dyn DnsClient>`, with the per-name query cache.
//!
//! - **[`config`]** - `MountConfig` (resolver endpoint, mount base, mount
//!   options, query timeout).
//!
//! # Usage
//!
//! The `FuseOps` trait is designed to be backed by a FUSE transport crate
//! for actual kernel communication. Since the interface is a Rust trait,
//! the engine can be exercised without a real mount:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dnsfs_fuse::{DnsFs, MountConfig};
//! use dnsfs_resolver::DnsTcpClient;
//! use dnsfs_types::RecordType;
//!
//! let config = Arc::new(MountConfig::default());
//! let client = Arc::new(DnsTcpClient::new(config.resolver_addr().unwrap()));
//! let fs = DnsFs::new(RecordType::A, client, config);
//! // Hand `fs` to a FUSE session bound to <mount_base>/A.
//! # let _ = fs;
//! ```

pub mod config;
pub mod filesystem;
pub mod ops;
pub mod registry;
pub mod reply;
pub mod types;

pub use config::{ConfigError, MountConfig};
pub use filesystem::{DnsClient, DnsFs};
pub use ops::FuseOps;
pub use registry::{NameRegistry, NodeKind};
pub use reply::FuseResult;
pub use types::{FileAttr, FuseEntryParam, FuseRequestContext};
