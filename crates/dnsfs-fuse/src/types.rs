//! Filesystem-facing types that mirror the FUSE kernel protocol structures.
//!
//! These abstract the raw protocol so the engine can be backed by the
//! `fuser` crate or a custom kernel binding, and tested without either.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use dnsfs_types::{Gid, Uid};

// ── Inode number constants ──────────────────────────────────────────────────

/// The FUSE root inode number (always 1 in the kernel protocol).
pub const FUSE_ROOT_ID: u64 = 1;

/// Base of the inode range handed out to directory-listing entries.
///
/// Listing inodes are transient: `TRANSIENT_INO_BASE + index + 1` per
/// emitted record, never entered into the name registry. The adapter
/// re-looks-up entries by name, which allocates the durable identity.
pub const TRANSIENT_INO_BASE: u64 = 2048;

// ── File type bits (matching libc S_IF* constants) ──────────────────────────

/// Regular file.
pub const S_IFREG: u32 = libc::S_IFREG as u32;
/// Directory.
pub const S_IFDIR: u32 = libc::S_IFDIR as u32;

/// Mode of every directory node: browsable by anyone.
pub const DIR_MODE: u32 = S_IFDIR | 0o777;
/// Mode of every leaf node: read-only for anyone.
pub const LEAF_MODE: u32 = S_IFREG | 0o444;

// ── File attributes ─────────────────────────────────────────────────────────

/// File attributes returned by getattr/lookup operations.
///
/// Mirrors the kernel `struct stat` fields FUSE cares about.
#[derive(Debug, Clone)]
pub struct FileAttr {
    /// Inode number.
    pub ino: u64,
    /// File size in bytes.
    pub size: u64,
    /// Number of 512-byte blocks allocated.
    pub blocks: u64,
    /// Last access time.
    pub atime: SystemTime,
    /// Last modification time.
    pub mtime: SystemTime,
    /// Last status change time.
    pub ctime: SystemTime,
    /// File mode (type + permission bits).
    pub mode: u32,
    /// Number of hard links.
    pub nlink: u32,
    /// Owner UID.
    pub uid: u32,
    /// Owner GID.
    pub gid: u32,
    /// Device number (unused, always 0).
    pub rdev: u32,
    /// Preferred I/O block size.
    pub blksize: u32,
}

impl Default for FileAttr {
    fn default() -> Self {
        Self {
            ino: 0,
            size: 0,
            blocks: 0,
            atime: UNIX_EPOCH,
            mtime: UNIX_EPOCH,
            ctime: UNIX_EPOCH,
            mode: 0,
            nlink: 0,
            uid: 0,
            gid: 0,
            rdev: 0,
            blksize: 0,
        }
    }
}

// ── FUSE entry param ────────────────────────────────────────────────────────

/// Entry returned by lookup, mirroring `struct fuse_entry_param`.
#[derive(Debug, Clone)]
pub struct FuseEntryParam {
    /// Inode number of the entry.
    pub ino: u64,
    /// Generation number (0; identities are never reused while mounted).
    pub generation: u64,
    /// File attributes.
    pub attr: FileAttr,
    /// Attribute cache validity duration.
    pub attr_timeout: Duration,
    /// Entry (name lookup) cache validity duration.
    pub entry_timeout: Duration,
}

// ── Open file flags ─────────────────────────────────────────────────────────

/// Parsed access mode of an open request.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenFlags {
    /// File was opened read-only.
    pub read_only: bool,
    /// File was opened write-only.
    pub write_only: bool,
    /// File was opened read-write.
    pub read_write: bool,
}

impl OpenFlags {
    /// Parse the access mode out of raw POSIX open flags.
    pub fn from_raw(flags: i32) -> Self {
        let access_mode = flags & libc::O_ACCMODE;
        Self {
            read_only: access_mode == libc::O_RDONLY,
            write_only: access_mode == libc::O_WRONLY,
            read_write: access_mode == libc::O_RDWR,
        }
    }

    /// Whether the request carries write intent.
    pub fn is_writable(&self) -> bool {
        self.write_only || self.read_write
    }
}

// ── FUSE request context ────────────────────────────────────────────────────

/// Context information about the caller making a request.
#[derive(Debug, Clone, Copy)]
pub struct FuseRequestContext {
    /// UID of the calling process.
    pub uid: Uid,
    /// GID of the calling process.
    pub gid: Gid,
    /// PID of the calling process.
    pub pid: u32,
}

// ── Dir entry for readdir ───────────────────────────────────────────────────

/// A single directory entry, with the attributes the enumerator synthesized.
#[derive(Debug, Clone)]
pub struct FuseDirEntry {
    /// Transient inode number for this listing pass.
    pub ino: u64,
    /// Offset for the next entry (opaque cursor).
    pub offset: i64,
    /// Entry name: the record's textual form, path-separator-substituted.
    pub name: String,
    /// Synthesized attributes.
    pub attr: FileAttr,
    /// How long the adapter may cache `attr` (tracks the answer-set TTL).
    pub attr_ttl: Duration,
}

// ── Timestamp synthesis ─────────────────────────────────────────────────────

/// The synthetic timestamp of an attribute set: now, pushed forward by the
/// TTL hint so the adapter's attribute cache roughly tracks the DNS TTL.
pub fn stamp_after(ttl_secs: u64) -> SystemTime {
    SystemTime::now() + Duration::from_secs(ttl_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_flags_read_only() {
        let flags = OpenFlags::from_raw(libc::O_RDONLY);
        assert!(flags.read_only);
        assert!(!flags.is_writable());
    }

    #[test]
    fn test_open_flags_write_intent() {
        assert!(OpenFlags::from_raw(libc::O_WRONLY).is_writable());
        assert!(OpenFlags::from_raw(libc::O_RDWR).is_writable());
        assert!(OpenFlags::from_raw(libc::O_RDWR | libc::O_NONBLOCK).is_writable());
    }

    #[test]
    fn test_modes() {
        assert_eq!(DIR_MODE & 0o777, 0o777);
        assert_eq!(LEAF_MODE & 0o777, 0o444);
        assert_ne!(DIR_MODE & S_IFDIR, 0);
        assert_ne!(LEAF_MODE & S_IFREG, 0);
    }

    #[test]
    fn test_stamp_after_pushes_forward() {
        let now = SystemTime::now();
        let stamped = stamp_after(300);
        let delta = stamped.duration_since(now).unwrap();
        assert!(delta >= Duration::from_secs(299));
        assert!(delta <= Duration::from_secs(301));
    }

    #[test]
    fn test_file_attr_default_is_zeroed() {
        let attr = FileAttr::default();
        assert_eq!(attr.ino, 0);
        assert_eq!(attr.size, 0);
        assert_eq!(attr.atime, UNIX_EPOCH);
    }
}
