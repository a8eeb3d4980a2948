//! Filesystem operations trait.
//!
//! `FuseOps` carries the read-only subset of the FUSE low-level operations
//! dnsfs serves. The kernel adapter (a FUSE transport crate) drives these;
//! the engine implements them. Default implementations return `ENOSYS`
//! where an answer is required and succeed where a no-op is acceptable.

use crate::reply::*;
use crate::types::FuseRequestContext;

/// Trait defining the filesystem operations served by a dnsfs engine.
///
/// The `ctx` parameter provides the UID/GID/PID of the calling process.
///
/// # Error handling
///
/// Operations return `FuseResult<T>` where the error value is an errno.
/// The engine confines itself to a small vocabulary: `ENOENT`, `EACCES`,
/// `ENOTSUP`, and `EISDIR` for opening a directory as a file.
#[async_trait::async_trait]
pub trait FuseOps: Send + Sync + 'static {
    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Called when the filesystem is mounted.
    async fn init(&self) -> FuseResult<()> {
        Ok(())
    }

    /// Called when the filesystem is unmounted.
    async fn destroy(&self) {}

    // ── Name lookup ─────────────────────────────────────────────────────

    /// Look up a directory entry by name and return its attributes.
    ///
    /// dnsfs only materializes names directly under the root; lookups
    /// under any other parent fail with `ENOENT`.
    async fn lookup(
        &self,
        ctx: FuseRequestContext,
        parent: u64,
        name: &str,
    ) -> FuseResult<ReplyEntry> {
        let _ = (ctx, parent, name);
        Err(libc::ENOSYS)
    }

    /// Forget about an inode.
    ///
    /// dnsfs identities live for the whole mount, so the default is a no-op.
    async fn forget(&self, ino: u64, nlookup: u64) {
        let _ = (ino, nlookup);
    }

    // ── Attributes ──────────────────────────────────────────────────────

    /// Get file attributes, synthesizing them from the node's kind.
    async fn getattr(
        &self,
        ctx: FuseRequestContext,
        ino: u64,
        fh: Option<u64>,
    ) -> FuseResult<ReplyAttr> {
        let _ = (ctx, ino, fh);
        Err(libc::ENOSYS)
    }

    /// Check access permissions.
    async fn access(&self, ctx: FuseRequestContext, ino: u64, mask: i32) -> FuseResult<()> {
        let _ = (ctx, ino, mask);
        Err(libc::ENOSYS)
    }

    // ── Directory I/O ───────────────────────────────────────────────────

    /// Open a directory for reading.
    async fn opendir(&self, ctx: FuseRequestContext, ino: u64) -> FuseResult<ReplyOpen> {
        let _ = (ctx, ino);
        Err(libc::ENOSYS)
    }

    /// Read directory entries.
    ///
    /// `offset` is an opaque cursor; 0 means start from the beginning.
    async fn readdir(
        &self,
        ctx: FuseRequestContext,
        ino: u64,
        fh: u64,
        offset: i64,
    ) -> FuseResult<ReplyDirectory> {
        let _ = (ctx, ino, fh, offset);
        Err(libc::ENOSYS)
    }

    /// Release an open directory.
    async fn releasedir(&self, ctx: FuseRequestContext, ino: u64, fh: u64) -> FuseResult<()> {
        let _ = (ctx, ino, fh);
        Ok(())
    }

    // ── File I/O ────────────────────────────────────────────────────────

    /// Open a file.
    async fn open(&self, ctx: FuseRequestContext, ino: u64, flags: i32) -> FuseResult<ReplyOpen> {
        let _ = (ctx, ino, flags);
        Err(libc::ENOSYS)
    }

    /// Read data from an open file.
    async fn read(
        &self,
        ctx: FuseRequestContext,
        ino: u64,
        fh: u64,
        offset: i64,
        size: u32,
    ) -> FuseResult<ReplyData> {
        let _ = (ctx, ino, fh, offset, size);
        Err(libc::ENOSYS)
    }

    /// Release an open file.
    async fn release(
        &self,
        ctx: FuseRequestContext,
        ino: u64,
        fh: u64,
        flags: i32,
    ) -> FuseResult<()> {
        let _ = (ctx, ino, fh, flags);
        Ok(())
    }

    // ── Extended attributes ─────────────────────────────────────────────

    /// Set an extended attribute. Never supported on this tree.
    async fn setxattr(
        &self,
        ctx: FuseRequestContext,
        ino: u64,
        name: &str,
        value: &[u8],
        flags: i32,
    ) -> FuseResult<()> {
        let _ = (ctx, ino, name, value, flags);
        Err(libc::ENOSYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnsfs_types::{Gid, Uid};

    /// A minimal no-op implementation for testing default methods.
    struct NoopFs;

    #[async_trait::async_trait]
    impl FuseOps for NoopFs {}

    fn ctx() -> FuseRequestContext {
        FuseRequestContext {
            uid: Uid(1000),
            gid: Gid(1000),
            pid: 1234,
        }
    }

    #[tokio::test]
    async fn test_default_init_succeeds() {
        assert!(NoopFs.init().await.is_ok());
    }

    #[tokio::test]
    async fn test_default_lookup_returns_enosys() {
        assert_eq!(NoopFs.lookup(ctx(), 1, "a").await.unwrap_err(), libc::ENOSYS);
    }

    #[tokio::test]
    async fn test_default_getattr_returns_enosys() {
        assert_eq!(NoopFs.getattr(ctx(), 1, None).await.unwrap_err(), libc::ENOSYS);
    }

    #[tokio::test]
    async fn test_default_readdir_returns_enosys() {
        assert_eq!(NoopFs.readdir(ctx(), 1, 0, 0).await.unwrap_err(), libc::ENOSYS);
    }

    #[tokio::test]
    async fn test_default_read_returns_enosys() {
        assert_eq!(
            NoopFs.read(ctx(), 1, 0, 0, 4096).await.unwrap_err(),
            libc::ENOSYS
        );
    }

    #[tokio::test]
    async fn test_default_release_paths_succeed() {
        assert!(NoopFs.release(ctx(), 1, 0, 0).await.is_ok());
        assert!(NoopFs.releasedir(ctx(), 1, 0).await.is_ok());
    }

    #[tokio::test]
    async fn test_default_forget_is_noop() {
        NoopFs.forget(1, 1).await;
    }
}
