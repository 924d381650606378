//! Fixture tree mounted by the generated-source tests.
//!
//! Generated by embedfs 0.1.0. Do not edit.
//!
//! 3 files in 3 directories, served through
//! `embedfs_vfs::VirtualFs`.

use embedfs_vfs::{Node, VirtualFs};
use std::sync::LazyLock;

/// Embedded read-only filesystem.
///
/// File contents are decoded lazily, once per file, on first access.
pub static FIXTURE: LazyLock<VirtualFs> = LazyLock::new(|| {
    VirtualFs::new(
        Node::dir("", 0, vec![
            Node::dir("a", 1700000000, vec![
                Node::file("b.txt", 2, 1700000000, r"H4sIAAAAAAACA8vIBACsKpPYAgAAAA=="),
            ]),
            Node::file("empty.txt", 0, 1700000000, ""),
            Node::dir("hollow", 1700000000, vec![]),
            Node::file("z.txt", 136, 1700000000, r"
H4sIAAAAAAACAxWMSQ7CIBSG95zid28a5yFewkQvABYoSnmFQqfT+7r+hnejEYv7/KASjQGGJnxL
2/WgQSdkxl4uM2qylXhK9toZiqXR5QbGDZrRogO8i4USt7bfiFfXuDCBDJRfm1hkysuWaW31ehho
fGC3PxxP58v1dq/EH4IrLN6IAAAA
"),
        ])
    )
    .expect("embedded tree was validated when it was packed")
});
