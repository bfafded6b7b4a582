use std::{
    io::{self, ErrorKind},
    path::PathBuf,
    time::Duration,
};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every error is terminal for the current invocation; nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error("subnet name {name:?} is invalid: illegal name character: only letters, no special characters allowed")]
    InvalidName { name: String },

    #[error("illegal weight, must be between 1 and 100 inclusive: {0}")]
    InvalidWeight(i64),

    #[error("time should be at least {}s in the future", .lead.as_secs())]
    TooSoon { lead: Duration },

    #[error("failed to parse {what} {input:?} ({reason})")]
    Parse {
        what: &'static str,
        input: String,
        reason: String,
    },

    #[error("failed to find the subnet ID for this subnet, has it been deployed/created on this network?")]
    NoSubnetId,

    #[error("nodeID not found in validator set: {0}")]
    NodeNotFound(String),

    #[error("invalid validation duration: {0}")]
    InvalidDuration(String),

    #[error("request to '{uri}' timed out after {timeout:?}")]
    TransportTimeout { uri: String, timeout: Duration },

    #[error("request to '{uri}' failed ({reason})")]
    Transport { uri: String, reason: String },

    #[error("failed to issue add-validator transaction ({0})")]
    Submission(String),

    #[error("network {0} is not supported yet (coming soon)")]
    NetworkNotSupported(String),

    #[error("no private keys found in '{}'", .0.display())]
    NoKeys(PathBuf),

    #[error("configuration for {0:?} already exists, use --force to overwrite")]
    ConfigExists(String),

    #[error("too many VMs selected, provide at most one VM selection flag")]
    TooManyVms,

    #[error("prompt failed ({0})")]
    Prompt(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub fn parse(what: &'static str, input: &str, reason: impl ToString) -> Self {
        Error::Parse {
            what,
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if the remote side did not answer within the request deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::TransportTimeout { .. })
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Io(e) => e,
            Error::TransportTimeout { .. } => io::Error::new(ErrorKind::TimedOut, e.to_string()),
            Error::InvalidName { .. }
            | Error::InvalidWeight(_)
            | Error::TooSoon { .. }
            | Error::Parse { .. }
            | Error::InvalidDuration(_)
            | Error::TooManyVms => io::Error::new(ErrorKind::InvalidInput, e.to_string()),
            Error::NoSubnetId | Error::NodeNotFound(_) | Error::NoKeys(_) => {
                io::Error::new(ErrorKind::NotFound, e.to_string())
            }
            Error::ConfigExists(_) => io::Error::new(ErrorKind::AlreadyExists, e.to_string()),
            Error::NetworkNotSupported(_) => {
                io::Error::new(ErrorKind::Unsupported, e.to_string())
            }
            _ => io::Error::new(ErrorKind::Other, e.to_string()),
        }
    }
}

#[test]
fn test_into_io_error() {
    let timeout = Error::TransportTimeout {
        uri: String::from("https://api.avax-test.network"),
        timeout: Duration::from_secs(1),
    };
    assert!(timeout.is_timeout());
    assert!(!Error::NoSubnetId.is_timeout());
    let e: io::Error = timeout.into();
    assert_eq!(e.kind(), ErrorKind::TimedOut);

    let e: io::Error = Error::InvalidWeight(101).into();
    assert_eq!(e.kind(), ErrorKind::InvalidInput);
    assert_eq!(
        e.to_string(),
        "illegal weight, must be between 1 and 100 inclusive: 101"
    );

    let e: io::Error = Error::NoSubnetId.into();
    assert_eq!(e.kind(), ErrorKind::NotFound);
}
