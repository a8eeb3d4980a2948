//! Emits static share-export configuration for the dnsfs mountpoints: one
//! read-only share block per record type, followed by the matching
//! unmount commands. Purely textual; never talks to a running engine.

use std::path::{Path, PathBuf};

use clap::Parser;
use dnsfs_types::RecordType;

/// dnsfs Export Config Generator
#[derive(Parser, Debug)]
#[command(name = "dnsfs-export-config", version, about)]
struct Args {
    /// Directory under which the per-record-type mountpoints live
    #[arg(long, default_value = "/tmp/dnsfs")]
    mount_base: PathBuf,
}

fn share_block(base: &Path, rtype: RecordType) -> String {
    format!(
        "[{rtype}]\n\
         path = {path}\n\
         comment = The location for all the {rtype} records\n\
         read only = yes\n",
        path = base.join(rtype.as_str()).display(),
    )
}

fn unmount_command(base: &Path, rtype: RecordType) -> String {
    format!("fusermount -uz {}", base.join(rtype.as_str()).display())
}

fn render(base: &Path) -> String {
    let mut out = String::new();
    for rtype in RecordType::ALL {
        out.push_str(&share_block(base, rtype));
        out.push('\n');
    }
    for rtype in RecordType::ALL {
        out.push_str(&unmount_command(base, rtype));
        out.push('\n');
    }
    out
}

fn main() {
    let args = Args::parse();
    print!("{}", render(&args.mount_base));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_block_format() {
        let block = share_block(Path::new("/tmp/dnsfs"), RecordType::A);
        assert_eq!(
            block,
            "[A]\npath = /tmp/dnsfs/A\ncomment = The location for all the A records\nread only = yes\n"
        );
    }

    #[test]
    fn test_unmount_command() {
        assert_eq!(
            unmount_command(Path::new("/tmp/dnsfs"), RecordType::TXT),
            "fusermount -uz /tmp/dnsfs/TXT"
        );
    }

    #[test]
    fn test_render_covers_every_type_twice() {
        let out = render(Path::new("/srv/dns"));
        for rtype in RecordType::ALL {
            assert!(out.contains(&format!("[{rtype}]\n")));
            assert!(out.contains(&format!("path = /srv/dns/{rtype}\n")));
            assert!(out.contains(&format!("fusermount -uz /srv/dns/{rtype}\n")));
        }
    }

    #[test]
    fn test_render_blocks_precede_unmounts() {
        let out = render(Path::new("/tmp/dnsfs"));
        let last_block = out.rfind("read only = yes").unwrap();
        let first_unmount = out.find("fusermount").unwrap();
        assert!(last_block < first_unmount);
    }
}
