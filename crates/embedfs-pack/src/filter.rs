//! Path predicates applied during the walk.
//!
//! A [`PathFilter`] sees every visited entry as a `/`-rooted path relative to
//! the walk root (`/a/b.txt`) together with its on-disk metadata. Rejecting a
//! directory prunes its whole subtree; rejecting a file skips that file only.
//!
//! Any `Fn(&str, &Metadata) -> bool` closure is a filter:
//!
//! ```
//! use embedfs_pack::PathFilter;
//!
//! let no_hidden = |path: &str, _: &std::fs::Metadata| {
//!     !path.rsplit('/').next().unwrap_or_default().starts_with('.')
//! };
//! # let meta = std::fs::metadata(".").unwrap();
//! assert!(!no_hidden.accept("/.git", &meta));
//! ```

use crate::error::{PackError, Result};
use embedfs_core::PackConfig;
use regex::Regex;
use std::fs::Metadata;

/// Decides whether a walked entry is packed.
pub trait PathFilter {
    /// Returns `false` to skip the entry (and its subtree, for directories).
    fn accept(&self, path: &str, metadata: &Metadata) -> bool;
}

impl<F> PathFilter for F
where
    F: Fn(&str, &Metadata) -> bool,
{
    fn accept(&self, path: &str, metadata: &Metadata) -> bool {
        self(path, metadata)
    }
}

/// Filter that accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl PathFilter for AcceptAll {
    fn accept(&self, _path: &str, _metadata: &Metadata) -> bool {
        true
    }
}

/// Include/exclude filter built from regular expressions.
///
/// A path matching any include pattern is accepted; otherwise a path
/// matching any exclude pattern is rejected; everything else is accepted.
///
/// # Examples
///
/// ```
/// use embedfs_pack::{PathFilter, RegexFilter};
///
/// let filter = RegexFilter::new(&["\\.keep$"], &["^/tmp"])?;
/// # let meta = std::fs::metadata(".").unwrap();
///
/// assert!(!filter.accept("/tmp", &meta));
/// assert!(filter.accept("/tmp/.keep", &meta));
/// assert!(filter.accept("/src/main.rs", &meta));
/// # Ok::<(), embedfs_pack::PackError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegexFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl RegexFilter {
    /// Compiles the include and exclude patterns.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::InvalidFilter`] for the first pattern that does
    /// not compile.
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Result<Self> {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// Builds the filter from the patterns of a pack configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::InvalidFilter`] for an invalid pattern.
    pub fn from_config(config: &PackConfig) -> Result<Self> {
        Self::new(&config.include, &config.exclude)
    }

    /// Returns `true` if no pattern was given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Applies the patterns to a path alone.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        if self.include.iter().any(|re| re.is_match(path)) {
            return true;
        }
        !self.exclude.iter().any(|re| re.is_match(path))
    }
}

impl PathFilter for RegexFilter {
    fn accept(&self, path: &str, _metadata: &Metadata) -> bool {
        self.matches(path)
    }
}

fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            let pattern = pattern.as_ref();
            Regex::new(pattern).map_err(|source| PackError::InvalidFilter {
                pattern: pattern.to_string(),
                source,
            })
        })
        .collect()
}
