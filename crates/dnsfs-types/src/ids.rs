strong_type!(
    /// A filesystem inode number.
    Ino,
    u64
);
strong_type!(
    /// A numeric user id.
    Uid,
    u32
);
strong_type!(
    /// A numeric group id.
    Gid,
    u32
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ino() {
        let ino = Ino(2049);
        assert_eq!(ino.0, 2049);
        assert_eq!(format!("{ino:?}"), "Ino(2049)");
    }

    #[test]
    fn test_uid_gid_are_distinct_types() {
        let uid = Uid(1000);
        let gid = Gid(1000);
        assert_eq!(uid.0, gid.0);
    }
}
