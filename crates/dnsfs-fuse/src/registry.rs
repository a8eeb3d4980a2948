//! The inode/name registry: the only place new identities are born.
//!
//! The registry maintains a strict bijection between inode numbers and DNS
//! names for the lifetime of one engine instance. Inodes are allocated
//! monotonically above the root and are never reused or remapped, so every
//! identity the kernel has seen stays valid until unmount.

use std::collections::HashMap;

use dnsfs_types::Ino;
use parking_lot::Mutex;

use crate::types::FUSE_ROOT_ID;

/// What a given inode denotes, computed in one place and consumed by
/// attribute synthesis, open, read and readdir alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The mount root. Browsable, deliberately listed as empty.
    Root,
    /// A registered name without the trailing dot: a browsable directory
    /// whose entries are the live answer records.
    Directory,
    /// A registered fully-qualified name (trailing dot): a file whose
    /// content is the raw wire response of the last query.
    TerminalLeaf,
    /// An inode the registry has never issued, e.g. a transient listing
    /// inode: rendered as an empty read-only file.
    Placeholder,
}

impl NodeKind {
    /// Whether this kind is served as a directory.
    pub fn is_directory(&self) -> bool {
        matches!(self, NodeKind::Root | NodeKind::Directory)
    }
}

#[derive(Default)]
struct Tables {
    name_to_ino: HashMap<String, Ino>,
    ino_to_name: HashMap<Ino, String>,
}

/// Bijective inode/name table for one engine instance.
pub struct NameRegistry {
    tables: Mutex<Tables>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
        }
    }

    /// Return the inode already mapped to `name`, or allocate the next one.
    ///
    /// Allocation order makes inodes strictly increasing: the n-th distinct
    /// name gets `root + n`. The same name always resolves to the same
    /// inode, and no inode ever changes its name.
    pub fn resolve_or_allocate(&self, name: &str) -> Ino {
        let mut tables = self.tables.lock();
        if let Some(&ino) = tables.name_to_ino.get(name) {
            return ino;
        }
        let ino = Ino(FUSE_ROOT_ID + tables.name_to_ino.len() as u64 + 1);
        tables.name_to_ino.insert(name.to_string(), ino);
        tables.ino_to_name.insert(ino, name.to_string());
        ino
    }

    /// The name mapped to `ino`, if the registry issued it.
    pub fn name_of(&self, ino: Ino) -> Option<String> {
        self.tables.lock().ino_to_name.get(&ino).cloned()
    }

    /// Whether `ino` was issued by this registry.
    pub fn contains(&self, ino: Ino) -> bool {
        self.tables.lock().ino_to_name.contains_key(&ino)
    }

    /// Classify an inode. The trailing dot is the leaf marker.
    pub fn node_kind(&self, ino: Ino) -> NodeKind {
        if ino.0 == FUSE_ROOT_ID {
            return NodeKind::Root;
        }
        match self.tables.lock().ino_to_name.get(&ino) {
            Some(name) if name.ends_with('.') => NodeKind::TerminalLeaf,
            Some(_) => NodeKind::Directory,
            None => NodeKind::Placeholder,
        }
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.tables.lock().name_to_ino.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NameRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameRegistry")
            .field("names", &self.len())
            .finish()
    }
}
