use std::fmt;

/// Subdirectory that, when present under a candidate root, becomes the root
/// that gets validated.
pub const MARKER_DIR: &str = "USRDIR";

/// Canonical disc layout.
pub const PRIMARY_DIRS: [&str; 8] = [
    "ENVS", "FMV", "GRAPHICS", "GUIMENU", "IRX", "MISC", "SOUNDS", "SUBTITLE",
];

/// Layout accepted as an alternative to [`PRIMARY_DIRS`]. Currently the same
/// names, kept separate so the two can diverge.
pub const ALTERNATE_DIRS: [&str; 8] = [
    "ENVS", "FMV", "GRAPHICS", "GUIMENU", "IRX", "MISC", "SOUNDS", "SUBTITLE",
];

/// Which required-directory set a root matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectorySet {
    Primary,
    Alternate,
}

impl fmt::Display for DirectorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectorySet::Primary => write!(f, "Primary"),
            DirectorySet::Alternate => write!(f, "Alternate"),
        }
    }
}

/// A named, ordered list of subdirectories that must all exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredDirectorySet {
    pub name: DirectorySet,
    pub dirs: Vec<String>,
}

impl RequiredDirectorySet {
    pub fn new<I, S>(name: DirectorySet, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name,
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }
}

/// The full set of rules a source root is validated against.
///
/// Names are case-sensitive literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryLayout {
    pub primary: RequiredDirectorySet,
    pub alternate: RequiredDirectorySet,
    pub marker: String,
}

impl DirectoryLayout {
    pub fn new(primary: RequiredDirectorySet, alternate: RequiredDirectorySet) -> Self {
        Self {
            primary,
            alternate,
            marker: MARKER_DIR.to_string(),
        }
    }

    /// Sets in the order they are tried.
    pub fn sets(&self) -> [&RequiredDirectorySet; 2] {
        [&self.primary, &self.alternate]
    }
}

impl Default for DirectoryLayout {
    fn default() -> Self {
        Self::new(
            RequiredDirectorySet::new(DirectorySet::Primary, PRIMARY_DIRS),
            RequiredDirectorySet::new(DirectorySet::Alternate, ALTERNATE_DIRS),
        )
    }
}
