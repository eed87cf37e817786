use std::fmt;
use thiserror::Error;

/// The remote call a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Any failure talking to the task server: transport error, non-success
/// status or an unreadable body. Callers do not distinguish between causes.
#[derive(Debug, Clone, Error)]
#[error("remote {operation} call failed: {reason}")]
pub struct RemoteCallFailed {
    pub operation: Operation,
    pub reason: String,
}

impl RemoteCallFailed {
    pub fn new(operation: Operation, reason: impl fmt::Display) -> Self {
        Self {
            operation,
            reason: reason.to_string(),
        }
    }
}
