//! Reply types for filesystem operations.
//!
//! Each operation produces one of these; the FUSE transport layer turns
//! them into kernel responses. Keeping them as plain structs lets the
//! `FuseOps` trait be tested without a kernel connection.

use std::time::Duration;

use bytes::Bytes;

use crate::types::{FileAttr, FuseDirEntry, FuseEntryParam};

/// Reply for lookup.
#[derive(Debug, Clone)]
pub struct ReplyEntry {
    pub entry: FuseEntryParam,
}

/// Reply for getattr.
#[derive(Debug, Clone)]
pub struct ReplyAttr {
    pub attr: FileAttr,
    pub attr_timeout: Duration,
}

/// Reply for open/opendir.
#[derive(Debug, Clone, Copy)]
pub struct ReplyOpen {
    /// File handle; dnsfs addresses content by inode, so `fh == ino`.
    pub fh: u64,
    /// Bypass the kernel page cache (leaf sizes change between fetches).
    pub direct_io: bool,
    /// The file does not support seeking reads independently of the cache.
    pub nonseekable: bool,
}

/// Reply for read.
#[derive(Debug, Clone)]
pub struct ReplyData {
    pub data: Bytes,
}

/// Reply for readdir.
#[derive(Debug, Clone)]
pub struct ReplyDirectory {
    pub entries: Vec<FuseDirEntry>,
}

/// Result type for filesystem operations.
///
/// The error is an errno value (positive integer, e.g. `libc::ENOENT`).
pub type FuseResult<T> = std::result::Result<T, i32>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_data_slicing() {
        let r = ReplyData {
            data: Bytes::from_static(b"\x12\x34\x00\x01"),
        };
        assert_eq!(r.data.len(), 4);
        assert_eq!(&r.data[..2], b"\x12\x34");
    }

    #[test]
    fn test_reply_open_is_inode_addressed() {
        let r = ReplyOpen {
            fh: 42,
            direct_io: true,
            nonseekable: true,
        };
        assert_eq!(r.fh, 42);
        assert!(r.direct_io);
    }

    #[test]
    fn test_fuse_result_err_is_errno() {
        let r: FuseResult<()> = Err(libc::ENOENT);
        assert_eq!(r.unwrap_err(), libc::ENOENT);
    }

    #[test]
    fn test_reply_directory_empty() {
        let r = ReplyDirectory { entries: vec![] };
        assert!(r.entries.is_empty());
    }
}
