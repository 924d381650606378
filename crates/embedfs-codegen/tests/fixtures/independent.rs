//! Fixture tree mounted by the generated-source tests.
//!
//! Generated by embedfs 0.1.0. Do not edit.
//!
//! 3 files in 3 directories. This module is
//! self-contained: it only needs the `base64` and `flate2` crates.

#![allow(dead_code)]

use base64::Engine as _;
use std::collections::HashMap;
use std::io::{self, Read as _, Seek as _};
use std::sync::{LazyLock, OnceLock};

/// Permission bits reported for every entry: read-only for everyone.
pub const READ_ONLY_MODE: u32 = 0o444;

/// Error returned by lookups in the embedded tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureError {
    /// No entry exists at the path
    NotFound(String),
    /// The path continues below a file, or a file was listed
    NotADirectory(String),
    /// Content was requested from a directory
    IsADirectory(String),
    /// The stored payload is corrupt
    Decode(String),
    /// A bounded directory listing has no entries left
    EndOfListing,
}

impl std::fmt::Display for FixtureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "file not found: {path}"),
            Self::NotADirectory(path) => write!(f, "not a directory: {path}"),
            Self::IsADirectory(path) => write!(f, "is a directory: {path}"),
            Self::Decode(message) => write!(f, "corrupt payload: {message}"),
            Self::EndOfListing => f.write_str("end of directory listing"),
        }
    }
}

impl std::error::Error for FixtureError {}

impl From<FixtureError> for io::Error {
    fn from(error: FixtureError) -> Self {
        let kind = match &error {
            FixtureError::NotFound(_) => io::ErrorKind::NotFound,
            FixtureError::NotADirectory(_) => io::ErrorKind::NotADirectory,
            FixtureError::IsADirectory(_) => io::ErrorKind::IsADirectory,
            FixtureError::Decode(_) => io::ErrorKind::InvalidData,
            FixtureError::EndOfListing => io::ErrorKind::UnexpectedEof,
        };
        Self::new(kind, error)
    }
}

type FixtureIndex = (Vec<usize>, HashMap<&'static str, usize>);

/// One entry of the embedded tree.
#[derive(Debug)]
pub enum FixtureNode {
    /// A directory and its children
    Dir {
        /// Base name, empty for the root
        name: &'static str,
        /// Modification time in seconds since the Unix epoch
        mod_time: i64,
        /// Children in pack order
        children: Vec<FixtureNode>,
        /// Name-sorted order and lookup table, built on first use
        index: OnceLock<FixtureIndex>,
    },
    /// A file and its compressed content
    File {
        /// Base name
        name: &'static str,
        /// Original content length
        size: u64,
        /// Modification time in seconds since the Unix epoch
        mod_time: i64,
        /// Gzip-compressed, base64-encoded content
        payload: &'static str,
        /// Decoded content, or the decode failure, computed on first use
        data: OnceLock<Result<Vec<u8>, FixtureError>>,
    },
}

impl FixtureNode {
    fn dir(name: &'static str, mod_time: i64, children: Vec<Self>) -> Self {
        Self::Dir {
            name,
            mod_time,
            children,
            index: OnceLock::new(),
        }
    }

    fn file(name: &'static str, size: u64, mod_time: i64, payload: &'static str) -> Self {
        Self::File {
            name,
            size,
            mod_time,
            payload,
            data: OnceLock::new(),
        }
    }

    /// Returns the base name of the entry.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dir { name, .. } | Self::File { name, .. } => name,
        }
    }

    /// Returns `true` for directories.
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Dir { .. })
    }

    /// Returns the original content length; zero for directories.
    pub fn size(&self) -> u64 {
        match self {
            Self::Dir { .. } => 0,
            Self::File { size, .. } => *size,
        }
    }

    /// Returns the modification time in seconds since the Unix epoch.
    pub fn mod_time(&self) -> i64 {
        match self {
            Self::Dir { mod_time, .. } | Self::File { mod_time, .. } => *mod_time,
        }
    }

    /// Returns the permission bits, always [`READ_ONLY_MODE`].
    pub fn mode(&self) -> u32 {
        READ_ONLY_MODE
    }

    fn index(&self) -> Option<&FixtureIndex> {
        match self {
            Self::Dir {
                children, index, ..
            } => Some(index.get_or_init(|| {
                let mut order: Vec<usize> = (0..children.len()).collect();
                order.sort_by_key(|&position| children[position].name());
                let by_name = order
                    .iter()
                    .map(|&position| (children[position].name(), position))
                    .collect();
                (order, by_name)
            })),
            Self::File { .. } => None,
        }
    }

    /// Resolves a `/`-separated path below this entry.
    ///
    /// Empty and `.` segments are ignored, and `..` cannot climb above the root.
    pub fn open(&self, path: &str) -> Result<&Self, FixtureError> {
        let mut segments: Vec<&str> = Vec::new();
        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }

        let mut node = self;
        let mut walked = String::new();
        for segment in segments {
            let (Self::Dir { children, .. }, Some((_, by_name))) = (node, node.index()) else {
                return Err(FixtureError::NotADirectory(walked));
            };
            walked.push('/');
            walked.push_str(segment);
            let Some(&position) = by_name.get(segment) else {
                return Err(FixtureError::NotFound(walked));
            };
            node = &children[position];
        }
        Ok(node)
    }

    /// Opens a handle on the entry at `path`.
    pub fn handle(&self, path: &str) -> Result<FixtureHandle<'_>, FixtureError> {
        Ok(FixtureHandle {
            node: self.open(path)?,
            cursor: None,
            listed: 0,
        })
    }

    /// Returns the decoded content of a file, decoding it on first use.
    pub fn bytes(&self) -> Result<&[u8], FixtureError> {
        match self {
            Self::Dir { name, .. } => Err(FixtureError::IsADirectory((*name).to_string())),
            Self::File { size: 0, .. } => Ok(<&[u8]>::default()),
            Self::File {
                name,
                size,
                payload,
                data,
                ..
            } => data
                .get_or_init(|| {
                    decode(payload, *size)
                        .map_err(|message| FixtureError::Decode(format!("{name}: {message}")))
                })
                .as_deref()
                .map_err(Clone::clone),
        }
    }

    /// Returns the children of a directory in name order.
    pub fn entries(&self) -> Result<Vec<&Self>, FixtureError> {
        match (self, self.index()) {
            (Self::Dir { children, .. }, Some((order, _))) => {
                Ok(order.iter().map(|&position| &children[position]).collect())
            }
            _ => Err(FixtureError::NotADirectory(self.name().to_string())),
        }
    }

    /// Reads the file at `path`.
    pub fn read(&self, path: &str) -> Result<&[u8], FixtureError> {
        self.open(path)?.bytes()
    }

    /// Lists the directory at `path` in name order.
    pub fn read_dir(&self, path: &str) -> Result<Vec<&Self>, FixtureError> {
        self.open(path)?.entries()
    }
}

/// An open entry: a read cursor over a file, or a listing position in a directory.
#[derive(Debug)]
pub struct FixtureHandle<'a> {
    node: &'a FixtureNode,
    cursor: Option<io::Cursor<&'a [u8]>>,
    listed: usize,
}

impl<'a> FixtureHandle<'a> {
    /// Returns the entry, decoding a file first so a corrupt payload is reported.
    pub fn stat(&self) -> Result<&'a FixtureNode, FixtureError> {
        if !self.node.is_dir() {
            self.node.bytes()?;
        }
        Ok(self.node)
    }

    /// Lists entries in name order, continuing where the last call stopped.
    ///
    /// With `count <= 0` every remaining entry is returned. With `count > 0`
    /// at most `count` entries are returned, and an exhausted listing fails
    /// with [`FixtureError::EndOfListing`].
    pub fn readdir(&mut self, count: isize) -> Result<Vec<&'a FixtureNode>, FixtureError> {
        let entries = self.node.entries()?;
        let remaining = entries.len().saturating_sub(self.listed);
        let take = match usize::try_from(count) {
            Ok(0) | Err(_) => remaining,
            Ok(_) if remaining == 0 => return Err(FixtureError::EndOfListing),
            Ok(limit) => limit.min(remaining),
        };
        let batch: Vec<&'a FixtureNode> =
            entries.into_iter().skip(self.listed).take(take).collect();
        self.listed += batch.len();
        Ok(batch)
    }

    /// Restarts the directory listing from the first entry.
    pub fn rewind_listing(&mut self) {
        self.listed = 0;
    }

    fn cursor(&mut self) -> io::Result<&mut io::Cursor<&'a [u8]>> {
        let data = self.node.bytes()?;
        Ok(self.cursor.get_or_insert_with(|| io::Cursor::new(data)))
    }
}

impl io::Read for FixtureHandle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor()?.read(buf)
    }
}

impl io::Seek for FixtureHandle<'_> {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        self.cursor()?.seek(pos)
    }
}

fn decode(payload: &str, size: u64) -> Result<Vec<u8>, String> {
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let compressed = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| e.to_string())?;
    let mut data = Vec::new();
    flate2::read::GzDecoder::new(compressed.as_slice())
        .read_to_end(&mut data)
        .map_err(|e| e.to_string())?;
    if data.len() as u64 == size {
        Ok(data)
    } else {
        Err(format!("decoded {} bytes, expected {size}", data.len()))
    }
}

/// Root of the embedded tree.
pub static FIXTURE: LazyLock<FixtureNode> = LazyLock::new(|| {
        FixtureNode::dir("", 0, vec![
            FixtureNode::dir("a", 1700000000, vec![
                FixtureNode::file("b.txt", 2, 1700000000, r"H4sIAAAAAAACA8vIBACsKpPYAgAAAA=="),
            ]),
            FixtureNode::file("empty.txt", 0, 1700000000, ""),
            FixtureNode::dir("hollow", 1700000000, vec![]),
            FixtureNode::file("z.txt", 136, 1700000000, r"
H4sIAAAAAAACAxWMSQ7CIBSG95zid28a5yFewkQvABYoSnmFQqfT+7r+hnejEYv7/KASjQGGJnxL
2/WgQSdkxl4uM2qylXhK9toZiqXR5QbGDZrRogO8i4USt7bfiFfXuDCBDJRfm1hkysuWaW31ehho
fGC3PxxP58v1dq/EH4IrLN6IAAAA
"),
        ])
});
