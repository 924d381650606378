//! Open-file handles.
//!
//! A [`Handle`] is what [`VirtualFs::open`](crate::VirtualFs::open) returns.
//! It borrows the resolved node and carries the only per-open state: a read
//! cursor over the decoded bytes, and a position in the directory listing.
//! Handles are cheap and independent, so any number of them may be open on
//! the same node.

use crate::node::Node;
use crate::types::{Metadata, Result, VfsError};
use std::io::{self, Cursor, Read, Seek, SeekFrom};

/// An open file or directory.
///
/// Reading and seeking go through [`std::io::Read`] and [`std::io::Seek`].
/// Directory handles are listed with [`Handle::readdir`].
///
/// # Examples
///
/// ```
/// use embedfs_vfs::VfsBuilder;
/// use std::io::Read;
///
/// let vfs = VfsBuilder::new().add_file("/a/b.txt", "hi").build()?;
///
/// let mut handle = vfs.open("/a/b.txt")?;
/// let mut text = String::new();
/// handle.read_to_string(&mut text)?;
/// assert_eq!(text, "hi");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Handle<'a> {
    node: &'a Node,
    path: String,
    cursor: Option<Cursor<&'a [u8]>>,
    listed: usize,
}

impl<'a> Handle<'a> {
    pub(crate) const fn new(node: &'a Node, path: String) -> Self {
        Self {
            node,
            path,
            cursor: None,
            listed: 0,
        }
    }

    /// Returns the cleaned path the handle was opened with.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the node behind the handle.
    #[must_use]
    pub const fn node(&self) -> &'a Node {
        self.node
    }

    /// Returns the node's metadata.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::Decode`] if the file payload is corrupt.
    pub fn stat(&self) -> Result<Metadata> {
        self.node.stat().map_err(|e| e.at_path(&self.path))
    }

    /// Returns the whole decoded content of a file.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::IsADirectory`] for directories and
    /// [`VfsError::Decode`] for corrupt payloads.
    pub fn bytes(&self) -> Result<&'a [u8]> {
        self.node.bytes().map_err(|e| e.at_path(&self.path))
    }

    /// Lists directory entries in name order, continuing where the last call stopped.
    ///
    /// With `count <= 0`, every remaining entry is returned (possibly none).
    /// With `count > 0`, at most `count` entries are returned, and once the
    /// listing is exhausted the call fails with [`VfsError::EndOfListing`].
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::NotADirectory`] on a file handle and
    /// [`VfsError::EndOfListing`] as described above.
    ///
    /// # Examples
    ///
    /// ```
    /// use embedfs_vfs::VfsBuilder;
    ///
    /// let vfs = VfsBuilder::new()
    ///     .add_file("/b.txt", "b")
    ///     .add_file("/a.txt", "a")
    ///     .build()?;
    ///
    /// let mut dir = vfs.open("/")?;
    /// assert_eq!(dir.readdir(1)?[0].name(), "a.txt");
    /// assert_eq!(dir.readdir(1)?[0].name(), "b.txt");
    /// assert!(dir.readdir(1).unwrap_err().is_end_of_listing());
    /// # Ok::<(), embedfs_vfs::VfsError>(())
    /// ```
    pub fn readdir(&mut self, count: isize) -> Result<Vec<Metadata>> {
        let Some(dir) = self.node.as_dir() else {
            return Err(VfsError::NotADirectory {
                path: self.path.clone(),
            });
        };

        let remaining = dir.len().saturating_sub(self.listed);
        let take = match usize::try_from(count) {
            Ok(0) | Err(_) => remaining,
            Ok(limit) => {
                if remaining == 0 {
                    return Err(VfsError::EndOfListing);
                }
                limit.min(remaining)
            }
        };

        let entries: Vec<Metadata> = dir
            .entries()
            .skip(self.listed)
            .take(take)
            .map(Node::metadata)
            .collect();
        self.listed += entries.len();
        Ok(entries)
    }

    /// Restarts the directory listing from the first entry.
    pub const fn rewind_listing(&mut self) {
        self.listed = 0;
    }

    /// Closes the handle. Nothing is released; the tree stays intact.
    ///
    /// # Errors
    ///
    /// Never fails.
    pub fn close(self) -> Result<()> {
        Ok(())
    }

    fn cursor(&mut self) -> io::Result<&mut Cursor<&'a [u8]>> {
        if self.cursor.is_none() {
            let data = self.node.bytes().map_err(|e| e.at_path(&self.path))?;
            self.cursor = Some(Cursor::new(data));
        }
        self.cursor
            .as_mut()
            .ok_or_else(|| io::Error::other("read cursor unavailable"))
    }
}

impl Read for Handle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor()?.read(buf)
    }
}

impl Seek for Handle<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor()?.seek(pos)
    }
}

#[cfg(test)]
mod tests {
    use crate::{VfsBuilder, VirtualFs};
    use std::io::{Read, Seek, SeekFrom};

    fn vfs() -> VirtualFs {
        VfsBuilder::new()
            .add_file("/a/b.txt", "hello world")
            .add_file("/a/c.txt", "c")
            .add_file("/a/a.txt", "a")
            .add_file("/empty.txt", "")
            .add_dir("/a/sub")
            .build()
            .unwrap()
    }

    #[test]
    fn test_read_whole_file() {
        let vfs = vfs();
        let mut handle = vfs.open("/a/b.txt").unwrap();
        let mut buf = Vec::new();
        handle.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"hello world");
    }

    #[test]
    fn test_seek_then_read() {
        let vfs = vfs();
        let mut handle = vfs.open("/a/b.txt").unwrap();
        assert_eq!(handle.seek(SeekFrom::Start(6)).unwrap(), 6);
        let mut rest = String::new();
        handle.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "world");

        handle.seek(SeekFrom::End(-5)).unwrap();
        let mut buf = [0u8; 2];
        handle.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"wo");
    }

    #[test]
    fn test_handles_are_independent() {
        let vfs = vfs();
        let mut first = vfs.open("/a/b.txt").unwrap();
        let mut second = vfs.open("/a/b.txt").unwrap();
        first.seek(SeekFrom::Start(6)).unwrap();

        let mut buf = [0u8; 5];
        second.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"hello");
    }

    #[test]
    fn test_empty_file_reads_nothing() {
        let vfs = vfs();
        let mut handle = vfs.open("/empty.txt").unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(handle.read(&mut buf).unwrap(), 0);
        assert_eq!(handle.stat().unwrap().size(), 0);
    }

    #[test]
    fn test_read_on_directory_fails() {
        let vfs = vfs();
        let mut handle = vfs.open("/a").unwrap();
        let mut buf = [0u8; 4];
        let err = handle.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::IsADirectory);
    }

    #[test]
    fn test_readdir_all() {
        let vfs = vfs();
        let mut handle = vfs.open("/a").unwrap();
        let names: Vec<String> = handle
            .readdir(0)
            .unwrap()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt", "sub"]);
        assert!(handle.readdir(-1).unwrap().is_empty());
    }

    #[test]
    fn test_readdir_in_batches() {
        let vfs = vfs();
        let mut handle = vfs.open("/a").unwrap();
        assert_eq!(handle.readdir(3).unwrap().len(), 3);
        let last = handle.readdir(3).unwrap();
        assert_eq!(last.len(), 1);
        assert!(last[0].is_dir());
        assert!(handle.readdir(3).unwrap_err().is_end_of_listing());

        handle.rewind_listing();
        assert_eq!(handle.readdir(10).unwrap().len(), 4);
    }

    #[test]
    fn test_readdir_empty_directory() {
        let vfs = vfs();
        let mut handle = vfs.open("/a/sub").unwrap();
        assert!(handle.readdir(0).unwrap().is_empty());
        assert!(handle.readdir(1).unwrap_err().is_end_of_listing());
    }

    #[test]
    fn test_readdir_on_file() {
        let vfs = vfs();
        let mut handle = vfs.open("/a/b.txt").unwrap();
        assert!(handle.readdir(0).unwrap_err().is_not_directory());
    }

    #[test]
    fn test_close_leaves_tree_usable() {
        let vfs = vfs();
        let handle = vfs.open("/a/b.txt").unwrap();
        handle.close().unwrap();
        assert_eq!(vfs.read("/a/b.txt").unwrap(), b"hello world");
    }
}
