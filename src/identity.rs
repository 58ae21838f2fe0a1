//! Sources of client host identities.

use crate::keys::HostKeyPair;
use bytes::Bytes;
use std::{fmt, fs, iter, path::PathBuf, sync::Arc};

/// An X.509 certificate held in its DER encoding.
#[derive(Clone, PartialEq, Eq)]
pub struct Certificate {
    der: Bytes,
}

impl Certificate {
    /// Wraps the DER bytes of a certificate.
    ///
    /// The framing is checked when the certificate is encoded into a key blob.
    pub fn from_der(der: impl Into<Bytes>) -> Self {
        Self { der: der.into() }
    }

    /// Returns the canonical DER encoding of the certificate.
    ///
    /// Fails unless the bytes are exactly one definite-length DER `SEQUENCE`.
    pub fn to_der(&self) -> Result<&[u8], crate::Error> {
        let der = &self.der[..];

        let (tag, rest) = der
            .split_first()
            .ok_or_else(|| crate::Error::certificate("empty certificate"))?;
        if *tag != 0x30 {
            return Err(crate::Error::certificate(format!(
                "expected SEQUENCE, found tag 0x{:02x}",
                tag
            )));
        }

        let (&len_byte, rest) = rest
            .split_first()
            .ok_or_else(|| crate::Error::certificate("missing length"))?;
        let (content_len, rest) = match len_byte {
            0x00..=0x7f => (len_byte as usize, rest),
            0x81..=0x84 => {
                let n = (len_byte & 0x7f) as usize;
                if rest.len() < n {
                    return Err(crate::Error::certificate("truncated length"));
                }
                let (len_bytes, rest) = rest.split_at(n);
                if len_bytes[0] == 0 {
                    return Err(crate::Error::certificate("non-minimal length"));
                }
                let len = len_bytes
                    .iter()
                    .fold(0usize, |acc, &b| (acc << 8) | b as usize);
                (len, rest)
            }
            _ => {
                return Err(crate::Error::certificate(format!(
                    "unsupported length octet 0x{:02x}",
                    len_byte
                )))
            }
        };

        if content_len != rest.len() {
            return Err(crate::Error::certificate(format!(
                "length {} does not cover {} content bytes",
                content_len,
                rest.len()
            )));
        }

        Ok(der)
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("len", &self.der.len())
            .finish()
    }
}

/// A host key pair together with its certificate chain.
#[derive(Clone, Debug)]
pub struct HostIdentity {
    key_pair: Arc<HostKeyPair>,
    certificates: Vec<Certificate>,
}

impl HostIdentity {
    pub fn new(key_pair: impl Into<Arc<HostKeyPair>>) -> Self {
        Self {
            key_pair: key_pair.into(),
            certificates: vec![],
        }
    }

    /// Attach a certificate chain. The order is kept as given.
    pub fn with_certificates(mut self, certificates: impl IntoIterator<Item = Certificate>) -> Self {
        self.certificates = certificates.into_iter().collect();
        self
    }

    pub fn key_pair(&self) -> &HostKeyPair {
        &*self.key_pair
    }

    pub fn certificates(&self) -> &[Certificate] {
        &self.certificates[..]
    }
}

/// The iterator returned from [`HostKeyIdentityProvider::load_host_keys`].
pub type HostIdentities = Box<dyn Iterator<Item = Result<HostIdentity, crate::Error>> + Send>;

/// A supplier of client host identities.
///
/// Each call starts a fresh pass over the identities. Items may be produced
/// lazily, in which case loading one of them may fail.
pub trait HostKeyIdentityProvider: Send + Sync {
    fn load_host_keys(&self) -> HostIdentities;
}

impl HostKeyIdentityProvider for HostIdentity {
    fn load_host_keys(&self) -> HostIdentities {
        Box::new(iter::once(Ok(self.clone())))
    }
}

impl HostKeyIdentityProvider for Vec<HostIdentity> {
    fn load_host_keys(&self) -> HostIdentities {
        Box::new(self.clone().into_iter().map(Ok))
    }
}

/// A host key stored on disk, with the certificates chained to it.
#[derive(Clone, Debug)]
pub struct HostKeyFile {
    pub key: PathBuf,
    pub certificates: Vec<PathBuf>,
}

impl HostKeyFile {
    pub fn new(key: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            certificates: vec![],
        }
    }

    pub fn certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.certificates.push(path.into());
        self
    }

    fn load(&self) -> Result<HostIdentity, crate::Error> {
        tracing::trace!("load host key from {}", self.key.display());
        let pkcs8 = fs::read(&self.key).map_err(crate::Error::io)?;
        let key_pair = HostKeyPair::from_pkcs8(&pkcs8[..])?;

        let certificates = self
            .certificates
            .iter()
            .map(|path| {
                fs::read(path)
                    .map(Certificate::from_der)
                    .map_err(crate::Error::io)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(HostIdentity::new(key_pair).with_certificates(certificates))
    }
}

/// Host keys read from PKCS#8 DER files.
///
/// A file is read when the sequence reaches it, not when the provider is created.
#[derive(Clone, Debug, Default)]
pub struct HostKeyFiles {
    files: Vec<HostKeyFile>,
}

impl HostKeyFiles {
    pub fn new(files: impl IntoIterator<Item = HostKeyFile>) -> Self {
        Self {
            files: files.into_iter().collect(),
        }
    }

    pub fn files(&self) -> &[HostKeyFile] {
        &self.files[..]
    }
}

impl HostKeyIdentityProvider for HostKeyFiles {
    fn load_host_keys(&self) -> HostIdentities {
        Box::new(self.files.clone().into_iter().map(|file| file.load()))
    }
}

/// A single-pass cursor over the identities of one authentication attempt.
///
/// Once it reports exhaustion it stays exhausted; a new attempt creates a new
/// sequence with [`IdentitySequence::reset`].
pub struct IdentitySequence {
    inner: Option<HostIdentities>,
}

impl IdentitySequence {
    pub fn empty() -> Self {
        Self { inner: None }
    }

    /// Start a fresh pass over the identities of `provider`, if any.
    pub fn reset(provider: Option<&dyn HostKeyIdentityProvider>) -> Self {
        Self {
            inner: provider.map(|provider| provider.load_host_keys()),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.inner.is_none()
    }
}

impl Default for IdentitySequence {
    fn default() -> Self {
        Self::empty()
    }
}

impl Iterator for IdentitySequence {
    type Item = Result<HostIdentity, crate::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.as_mut()?.next();
        if item.is_none() {
            self.inner = None;
        }
        item
    }
}

impl iter::FusedIterator for IdentitySequence {}

impl fmt::Debug for IdentitySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentitySequence")
            .field("exhausted", &self.is_exhausted())
            .finish()
    }
}
