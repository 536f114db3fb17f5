//! Errors generated by the engine.
use crate::Id;
use itertools::Itertools;
use thiserror::Error as ThisError;

/// Convenience wrapper to represent success or a meaningful engine error.
pub type EvalResult<T> = std::result::Result<T, Error>;

/// A wrapper around [ErrorKind]. Results produced by every transformation
/// and analysis carry this type, so the kind is boxed to keep them small.
pub struct Error(Box<ErrorKind>);

/// The different kinds of failure the engine reports.
///
/// A deadlocked simulation is not an error: it is reported through the
/// scheduler's result.
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// The graph violates a structural invariant: an edge endpoint or port
    /// that does not belong to the graph, a non-positive rate, a zero
    /// repetition count, or a meaningless duration.
    #[error("malformed graph: {0}")]
    MalformedStructure(String),

    /// A graph contains itself through the nested graphs of its
    /// hierarchical actors. The path lists the graphs on the cycle.
    #[error("hierarchy cycle: {}", .0.iter().join(" -> "))]
    HierarchyCycle(Vec<Id>),

    /// Integer arithmetic left its representable range.
    #[error("arithmetic range error: {0}")]
    ArithmeticRange(String),

    /// The balance equations of the graph have no positive solution.
    #[error("inconsistent rates: {0}")]
    InconsistentRates(String),

    /// The requested evaluation strategy is not provided by this engine.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Miscellaneous error message
    #[error("{0}")]
    Misc(String),
}

impl Error {
    pub fn malformed<S: ToString>(msg: S) -> Self {
        Self(Box::new(ErrorKind::MalformedStructure(msg.to_string())))
    }

    pub fn hierarchy_cycle(path: Vec<Id>) -> Self {
        Self(Box::new(ErrorKind::HierarchyCycle(path)))
    }

    pub fn arithmetic<S: ToString>(msg: S) -> Self {
        Self(Box::new(ErrorKind::ArithmeticRange(msg.to_string())))
    }

    pub fn inconsistent_rates<S: ToString>(msg: S) -> Self {
        Self(Box::new(ErrorKind::InconsistentRates(msg.to_string())))
    }

    pub fn unsupported<S: ToString>(msg: S) -> Self {
        Self(Box::new(ErrorKind::Unsupported(msg.to_string())))
    }

    pub fn misc<S: ToString>(msg: S) -> Self {
        Self(Box::new(ErrorKind::Misc(msg.to_string())))
    }

    /// The kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// True when the error reports a malformed model rather than a failed
    /// computation.
    pub fn is_structural(&self) -> bool {
        matches!(
            *self.0,
            ErrorKind::MalformedStructure(_) | ErrorKind::HierarchyCycle(_)
        )
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&*self.0, f)
    }
}

// Print the message rather than the structure when returned from `main`.
impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self(Box::new(kind))
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::misc(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::misc(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchy_cycle_message_lists_path() {
        let err = Error::hierarchy_cycle(vec![
            "top".into(),
            "sub".into(),
            "top".into(),
        ]);
        assert_eq!(err.to_string(), "hierarchy cycle: top -> sub -> top");
        assert!(err.is_structural());
    }

    #[test]
    fn arithmetic_errors_are_not_structural() {
        let err = Error::arithmetic("3 * u64::MAX");
        assert!(matches!(err.kind(), ErrorKind::ArithmeticRange(_)));
        assert!(!err.is_structural());
    }
}
