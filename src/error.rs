use std::io;

/// The error type returned from the authentication layer.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(ErrorImpl);

#[derive(Debug, thiserror::Error)]
enum ErrorImpl {
    #[error("I/O error")]
    Io(#[source] io::Error),

    #[error("transport: {0}")]
    Transport(String),

    #[error("userauth: {0}")]
    Userauth(String),

    #[error("no signature algorithm matches key type {key_type}")]
    NoMatchingAlgorithm { key_type: String },

    #[error("no signer could be located for algorithm {algorithm}")]
    NoSigner { algorithm: String },

    #[error("{context}: received unexpected packet {name} ({typ})")]
    Protocol {
        typ: u8,
        name: &'static str,
        context: String,
    },

    #[error("certificate encoding: {0}")]
    Certificate(String),

    #[error("host key: {0}")]
    Key(String),

    #[error("signing failed: {0}")]
    Sign(String),
}

/// The category of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    Io,
    Transport,
    Userauth,
    /// The offered signature algorithms have no entry for the key type.
    NoMatchingAlgorithm,
    /// An algorithm was offered but its signer could not be instantiated.
    NoSigner,
    /// The peer sent a message the current method does not handle.
    Protocol,
    Certificate,
    Key,
    Sign,
}

impl Error {
    pub fn io(err: io::Error) -> Self {
        Self(ErrorImpl::Io(err))
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self(ErrorImpl::Transport(msg.into()))
    }

    pub(crate) fn userauth(msg: impl Into<String>) -> Self {
        Self(ErrorImpl::Userauth(msg.into()))
    }

    pub(crate) fn no_matching_algorithm(key_type: impl Into<String>) -> Self {
        Self(ErrorImpl::NoMatchingAlgorithm {
            key_type: key_type.into(),
        })
    }

    pub(crate) fn no_signer(algorithm: impl Into<String>) -> Self {
        Self(ErrorImpl::NoSigner {
            algorithm: algorithm.into(),
        })
    }

    pub(crate) fn protocol(typ: u8, context: impl Into<String>) -> Self {
        Self(ErrorImpl::Protocol {
            typ,
            name: crate::consts::message_name(typ),
            context: context.into(),
        })
    }

    pub(crate) fn certificate(msg: impl Into<String>) -> Self {
        Self(ErrorImpl::Certificate(msg.into()))
    }

    pub(crate) fn key(msg: impl Into<String>) -> Self {
        Self(ErrorImpl::Key(msg.into()))
    }

    pub(crate) fn sign(msg: impl Into<String>) -> Self {
        Self(ErrorImpl::Sign(msg.into()))
    }

    pub fn kind(&self) -> ErrorKind {
        match self.0 {
            ErrorImpl::Io(..) => ErrorKind::Io,
            ErrorImpl::Transport(..) => ErrorKind::Transport,
            ErrorImpl::Userauth(..) => ErrorKind::Userauth,
            ErrorImpl::NoMatchingAlgorithm { .. } => ErrorKind::NoMatchingAlgorithm,
            ErrorImpl::NoSigner { .. } => ErrorKind::NoSigner,
            ErrorImpl::Protocol { .. } => ErrorKind::Protocol,
            ErrorImpl::Certificate(..) => ErrorKind::Certificate,
            ErrorImpl::Key(..) => ErrorKind::Key,
            ErrorImpl::Sign(..) => ErrorKind::Sign,
        }
    }

    /// Returns the message number carried by a protocol violation.
    pub fn message_number(&self) -> Option<u8> {
        match self.0 {
            ErrorImpl::Protocol { typ, .. } => Some(typ),
            _ => None,
        }
    }
}
