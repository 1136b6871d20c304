use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How the confirmed source tree is brought into the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferChoice {
    Copy,
    Move,
    UseInPlace,
}

impl TransferChoice {
    pub const ALL: [TransferChoice; 3] = [
        TransferChoice::Copy,
        TransferChoice::Move,
        TransferChoice::UseInPlace,
    ];

    /// Menu number shown to the operator.
    pub fn key(&self) -> char {
        match self {
            TransferChoice::Copy => '1',
            TransferChoice::Move => '2',
            TransferChoice::UseInPlace => '3',
        }
    }
}

impl fmt::Display for TransferChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferChoice::Copy => write!(f, "Copy"),
            TransferChoice::Move => write!(f, "Move"),
            TransferChoice::UseInPlace => write!(f, "Use in place"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid choice '{0}'")]
pub struct UnknownChoice(pub String);

impl FromStr for TransferChoice {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "copy" => Ok(TransferChoice::Copy),
            "2" | "move" => Ok(TransferChoice::Move),
            "3" | "use" => Ok(TransferChoice::UseInPlace),
            _ => Err(UnknownChoice(s.trim().to_string())),
        }
    }
}

/// Files transferred so far out of a precomputed total. Display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub completed: usize,
    pub total: usize,
}

impl TransferProgress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.completed as f64 / self.total as f64) * 100.0
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}
