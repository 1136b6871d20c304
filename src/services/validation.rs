//! Source layout validation.
//!
//! A candidate root is valid when every directory of one required set exists
//! directly under it. If the root contains the marker directory (`USRDIR`),
//! the marker's contents are validated instead of the root itself.
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use remake_init::models::DirectoryLayout;
//! use remake_init::services::DirectorySetValidator;
//!
//! let validator = DirectorySetValidator::new(DirectoryLayout::default());
//! let root = validator.resolve_validation_root(Utf8Path::new("D:/Rips/TSGPS2"));
//! let result = validator.validate_against_either_set(&root);
//! if let Some(set) = result.matched {
//!     println!("{} matches the {} layout", root, set);
//! }
//! ```

use crate::error::InitError;
use crate::models::{DirectoryLayout, DirectorySet};
use camino::{Utf8Path, Utf8PathBuf};

/// Result of checking a root against both required sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMatch {
    pub valid: bool,
    pub matched: Option<DirectorySet>,
}

impl LayoutMatch {
    fn found(set: DirectorySet) -> Self {
        Self {
            valid: true,
            matched: Some(set),
        }
    }

    fn none() -> Self {
        Self {
            valid: false,
            matched: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DirectorySetValidator {
    layout: DirectoryLayout,
}

impl DirectorySetValidator {
    pub fn new(layout: DirectoryLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &DirectoryLayout {
        &self.layout
    }

    /// True iff the marker directory exists directly under `root`.
    pub fn has_marker(&self, root: &Utf8Path) -> bool {
        root.join(&self.layout.marker).is_dir()
    }

    /// The directory validation should run against: the marker directory
    /// when present, otherwise `root` itself.
    ///
    /// Only looks one level down and never touches the filesystem beyond a
    /// metadata check.
    pub fn resolve_validation_root(&self, root: &Utf8Path) -> Utf8PathBuf {
        if self.has_marker(root) {
            let marker = root.join(&self.layout.marker);
            tracing::debug!("Found {} under {}, validating {}", self.layout.marker, root, marker);
            marker
        } else {
            root.to_path_buf()
        }
    }

    /// Validate the layout of `root` against the primary set, then the
    /// alternate set. The first full match wins; sets are never combined.
    ///
    /// # Arguments
    /// * `root` - Directory whose immediate children are checked, usually the
    ///   result of [`resolve_validation_root`](Self::resolve_validation_root)
    ///
    /// # Returns
    /// A [`LayoutMatch`] naming the matched set, or an invalid match when
    /// neither set is complete
    pub fn validate_against_either_set(&self, root: &Utf8Path) -> LayoutMatch {
        for set in self.layout.sets() {
            let missing = missing_dirs(root, set.dirs.as_slice());
            if missing.is_empty() {
                tracing::info!(
                    "All {} directories from the {} set found in {}",
                    set.dirs.len(),
                    set.name,
                    root
                );
                return LayoutMatch::found(set.name);
            }
            tracing::debug!(
                "{} set incomplete in {}, missing: {}",
                set.name,
                root,
                missing.join(", ")
            );
        }

        tracing::warn!("{} does not match any required directory set", root);
        LayoutMatch::none()
    }
}

/// True iff every name in `required` is an existing directory under `root`.
///
/// A missing `root` yields false.
pub fn all_present<S: AsRef<str>>(root: &Utf8Path, required: &[S]) -> bool {
    root.is_dir() && missing_dirs(root, required).is_empty()
}

/// Names from `required` that are not directories under `root`.
pub fn missing_dirs<'a, S: AsRef<str>>(root: &Utf8Path, required: &'a [S]) -> Vec<&'a str> {
    if !root.is_dir() {
        return required.iter().map(AsRef::as_ref).collect();
    }

    required
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !root.join(name).is_dir())
        .collect()
}

/// Accept `path` only if it names an existing directory.
pub fn require_directory(path: &Utf8Path) -> Result<(), InitError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(InitError::InvalidSourcePath(path.to_path_buf()))
    }
}
