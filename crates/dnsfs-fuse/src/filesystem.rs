//! The dnsfs engine.
//!
//! `DnsFs` implements the `FuseOps` trait for one record type. It owns the
//! inode/name registry and the per-name query cache, and delegates all DNS
//! traffic to an `Arc<dyn DnsClient>`. One instance is created per record
//! type; instances share no mutable state.
//!
//! The engine is a point-in-time lazy cache over DNS, not a resolver:
//! every attribute access of a dot-name re-fetches and overwrites the
//! cached wire response, directory listings resolve independently of that
//! cache, and nothing is invalidated on a TTL schedule.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::{debug, info};

use dnsfs_resolver::{AnswerSet, DnsTcpClient, ResolveError};
use dnsfs_types::{Gid, Ino, RecordType, Uid};

use crate::config::MountConfig;
use crate::ops::FuseOps;
use crate::registry::{NameRegistry, NodeKind};
use crate::reply::*;
use crate::types::*;

// ── Client trait ────────────────────────────────────────────────────────────

/// Abstraction over the DNS resolution layer.
///
/// The engine delegates all network traffic to this trait. In production
/// it is backed by [`DnsTcpClient`]; in tests it is mocked.
#[async_trait::async_trait]
pub trait DnsClient: Send + Sync + 'static {
    /// One raw query; the response is the leaf file content.
    async fn raw_query(&self, name: &str, rtype: RecordType) -> Result<Bytes, ResolveError>;

    /// One record-set resolution; the answers become directory entries.
    async fn resolve(&self, name: &str, rtype: RecordType) -> Result<AnswerSet, ResolveError>;
}

#[async_trait::async_trait]
impl DnsClient for DnsTcpClient {
    async fn raw_query(&self, name: &str, rtype: RecordType) -> Result<Bytes, ResolveError> {
        DnsTcpClient::raw_query(self, name, rtype).await
    }

    async fn resolve(&self, name: &str, rtype: RecordType) -> Result<AnswerSet, ResolveError> {
        DnsTcpClient::resolve(self, name, rtype).await
    }
}

// ── Engine ──────────────────────────────────────────────────────────────────

/// The filesystem engine for one record type.
pub struct DnsFs {
    /// The record type this instance is fixed to.
    record_type: RecordType,

    /// DNS client all queries go through.
    client: Arc<dyn DnsClient>,

    /// Mount configuration.
    config: Arc<MountConfig>,

    /// The inode/name bijection. Grows monotonically, never shrinks.
    registry: NameRegistry,

    /// Last wire response per dot-name. Overwritten on every re-fetch.
    answer_cache: Mutex<HashMap<String, Bytes>>,

    /// Effective identity of the serving process, stamped on every node.
    owner_uid: Uid,
    owner_gid: Gid,
}

/// The effective uid/gid of the current process.
pub fn process_owner() -> (Uid, Gid) {
    // SAFETY: geteuid/getegid cannot fail and take no arguments.
    unsafe { (Uid(libc::geteuid()), Gid(libc::getegid())) }
}

impl DnsFs {
    pub fn new(record_type: RecordType, client: Arc<dyn DnsClient>, config: Arc<MountConfig>) -> Self {
        let (owner_uid, owner_gid) = process_owner();
        Self {
            record_type,
            client,
            config,
            registry: NameRegistry::new(),
            answer_cache: Mutex::new(HashMap::new()),
            owner_uid,
            owner_gid,
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn config(&self) -> &MountConfig {
        &self.config
    }

    /// Number of names the registry has materialized.
    pub fn known_names(&self) -> usize {
        self.registry.len()
    }

    /// Number of dot-names with a cached wire response.
    pub fn cached_responses(&self) -> usize {
        self.answer_cache.lock().len()
    }

    /// Synthesize attributes for a node of the given kind.
    ///
    /// All timestamps are "now + ttl_hint" so the adapter's attribute cache
    /// roughly tracks the DNS TTL of the answer set a node came from.
    fn attr_for_kind(&self, ino: u64, kind: NodeKind, size: u64, ttl_hint: u64) -> FileAttr {
        let (mode, nlink) = if kind.is_directory() {
            (DIR_MODE, 2)
        } else {
            (LEAF_MODE, 1)
        };
        let stamp = stamp_after(ttl_hint);
        FileAttr {
            ino,
            size,
            blocks: (size + 511) / 512,
            atime: stamp,
            mtime: stamp,
            ctime: stamp,
            mode,
            nlink,
            uid: self.owner_uid.0,
            gid: self.owner_gid.0,
            rdev: 0,
            blksize: 512,
        }
    }

    /// Fetch the wire response for a dot-name and cache it under the name,
    /// overwriting any previous response.
    async fn fetch_and_cache(&self, name: &str) -> Result<Bytes, ResolveError> {
        let wire = self.client.raw_query(name, self.record_type).await?;
        self.answer_cache
            .lock()
            .insert(name.to_string(), wire.clone());
        Ok(wire)
    }

    /// The attribute decision table.
    ///
    /// A terminal leaf triggers a synchronous fetch; its failure is
    /// reported as "no such entry" without distinguishing the DNS-level
    /// reason. Directories and placeholders never touch the network.
    async fn synthesize_attr(&self, ino: u64, ttl_hint: u64) -> FuseResult<FileAttr> {
        let kind = self.registry.node_kind(Ino(ino));
        match kind {
            NodeKind::TerminalLeaf => {
                let name = self.registry.name_of(Ino(ino)).ok_or(libc::ENOENT)?;
                match self.fetch_and_cache(&name).await {
                    Ok(wire) => Ok(self.attr_for_kind(ino, kind, wire.len() as u64, ttl_hint)),
                    Err(err) => {
                        debug!(name, %err, "query failed");
                        Err(libc::ENOENT)
                    }
                }
            }
            NodeKind::Root | NodeKind::Directory | NodeKind::Placeholder => {
                Ok(self.attr_for_kind(ino, kind, 0, ttl_hint))
            }
        }
    }

    /// Turn a record's textual form into a single path component by
    /// substituting the path separator with the visually similar U+FF0F.
    fn display_name(text: &str) -> String {
        text.replace('/', "\u{FF0F}")
    }
}

#[async_trait::async_trait]
impl FuseOps for DnsFs {
    async fn init(&self) -> FuseResult<()> {
        info!(record_type = %self.record_type, "dnsfs_init");
        Ok(())
    }

    async fn destroy(&self) {
        info!(record_type = %self.record_type, "dnsfs_destroy");
    }

    async fn lookup(
        &self,
        ctx: FuseRequestContext,
        parent: u64,
        name: &str,
    ) -> FuseResult<ReplyEntry> {
        debug!(parent, name, pid = ctx.pid, "lookup");

        // Names materialize only directly under the root.
        if parent != FUSE_ROOT_ID {
            return Err(libc::ENOENT);
        }

        let ino = self.registry.resolve_or_allocate(name);
        let attr = self.synthesize_attr(ino.0, 0).await?;

        Ok(ReplyEntry {
            entry: FuseEntryParam {
                ino: ino.0,
                generation: 0,
                attr,
                attr_timeout: Duration::ZERO,
                entry_timeout: Duration::ZERO,
            },
        })
    }

    async fn forget(&self, ino: u64, nlookup: u64) {
        // Identities are never reused while the instance runs.
        debug!(ino, nlookup, "forget");
    }

    async fn getattr(
        &self,
        ctx: FuseRequestContext,
        ino: u64,
        _fh: Option<u64>,
    ) -> FuseResult<ReplyAttr> {
        debug!(ino, pid = ctx.pid, "getattr");
        let attr = self.synthesize_attr(ino, 0).await?;
        Ok(ReplyAttr {
            attr,
            attr_timeout: Duration::ZERO,
        })
    }

    async fn access(&self, ctx: FuseRequestContext, ino: u64, mask: i32) -> FuseResult<()> {
        debug!(ino, mask, pid = ctx.pid, "access");
        Ok(())
    }

    async fn opendir(&self, ctx: FuseRequestContext, ino: u64) -> FuseResult<ReplyOpen> {
        debug!(ino, pid = ctx.pid, "opendir");
        if ino != FUSE_ROOT_ID && !self.registry.contains(Ino(ino)) {
            return Err(libc::ENOENT);
        }
        Ok(ReplyOpen {
            fh: ino,
            direct_io: false,
            nonseekable: false,
        })
    }

    async fn readdir(
        &self,
        ctx: FuseRequestContext,
        ino: u64,
        _fh: u64,
        offset: i64,
    ) -> FuseResult<ReplyDirectory> {
        debug!(ino, offset, pid = ctx.pid, "readdir");

        // The root is left empty: the tree below it is populated lazily by
        // lookups, not pre-enumerated.
        if ino == FUSE_ROOT_ID {
            return Ok(ReplyDirectory { entries: vec![] });
        }

        let name = self.registry.name_of(Ino(ino)).ok_or(libc::ENOENT)?;

        // An independent resolution, not the leaf cache. Failure means an
        // empty directory, never an error.
        let answers = match self.client.resolve(&name, self.record_type).await {
            Ok(answers) => answers,
            Err(err) => {
                debug!(name, %err, "resolution failed, serving empty listing");
                AnswerSet::default()
            }
        };

        // The listing is produced in one pass; nonzero cursors mean the
        // pass is over.
        if offset != 0 {
            return Ok(ReplyDirectory { entries: vec![] });
        }

        let ttl_hint = u64::from(answers.ttl);
        let mut entries = Vec::with_capacity(answers.records.len());
        for (idx, record) in answers.records.iter().enumerate() {
            let transient_ino = TRANSIENT_INO_BASE + idx as u64 + 1;
            let attr = self.synthesize_attr(transient_ino, ttl_hint).await?;
            entries.push(FuseDirEntry {
                ino: transient_ino,
                offset: (idx + 1) as i64,
                name: Self::display_name(&record.text),
                attr,
                attr_ttl: Duration::from_secs(ttl_hint),
            });
        }

        Ok(ReplyDirectory { entries })
    }

    async fn open(&self, ctx: FuseRequestContext, ino: u64, flags: i32) -> FuseResult<ReplyOpen> {
        debug!(ino, flags, pid = ctx.pid, "open");

        if OpenFlags::from_raw(flags).is_writable() {
            return Err(libc::EACCES);
        }

        match self.registry.node_kind(Ino(ino)) {
            NodeKind::Root | NodeKind::Directory => Err(libc::EISDIR),
            // direct_io + nonseekable: the cached length changes between
            // fetches, so the kernel must not cache pages or trust sizes.
            NodeKind::TerminalLeaf => Ok(ReplyOpen {
                fh: ino,
                direct_io: true,
                nonseekable: true,
            }),
            NodeKind::Placeholder => Err(libc::EACCES),
        }
    }

    async fn read(
        &self,
        ctx: FuseRequestContext,
        ino: u64,
        _fh: u64,
        offset: i64,
        size: u32,
    ) -> FuseResult<ReplyData> {
        debug!(ino, offset, size, pid = ctx.pid, "read");

        let name = self.registry.name_of(Ino(ino)).ok_or(libc::EACCES)?;
        let wire = self
            .answer_cache
            .lock()
            .get(&name)
            .cloned()
            .ok_or(libc::ENOENT)?;

        let start = usize::try_from(offset.max(0)).unwrap_or(usize::MAX).min(wire.len());
        let end = start.saturating_add(size as usize).min(wire.len());
        Ok(ReplyData {
            data: wire.slice(start..end),
        })
    }

    async fn release(
        &self,
        ctx: FuseRequestContext,
        ino: u64,
        _fh: u64,
        _flags: i32,
    ) -> FuseResult<()> {
        debug!(ino, pid = ctx.pid, "release");
        Ok(())
    }

    async fn setxattr(
        &self,
        _ctx: FuseRequestContext,
        ino: u64,
        name: &str,
        _value: &[u8],
        _flags: i32,
    ) -> FuseResult<()> {
        debug!(ino, name, "setxattr rejected");
        Err(libc::ENOTSUP)
    }
}

impl std::fmt::Debug for DnsFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsFs")
            .field("record_type", &self.record_type)
            .field("known_names", &self.registry.len())
            .field("cached_responses", &self.answer_cache.lock().len())
            .finish()
    }
}
