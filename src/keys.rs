//! Host key pairs and their SSH public key encoding.

// Refs:
// * https://tools.ietf.org/html/rfc4253#section-6.6
// * https://tools.ietf.org/html/rfc5656#section-3.1
// * https://tools.ietf.org/html/rfc8709#section-4

use crate::util::{put_ssh_mpint, put_ssh_string};
use bytes::BufMut;
use ring::signature::{self, EcdsaKeyPair, Ed25519KeyPair, KeyPair as _};
use rsa::{pkcs8::DecodePrivateKey as _, traits::PublicKeyParts as _, RsaPrivateKey};
use std::fmt;

pub const SSH_ED25519: &str = "ssh-ed25519";
pub const ECDSA_SHA2_NISTP256: &str = "ecdsa-sha2-nistp256";
pub const ECDSA_SHA2_NISTP384: &str = "ecdsa-sha2-nistp384";
pub const SSH_RSA: &str = "ssh-rsa";

const RSA_MIN_MODULUS_BITS: usize = 2048;

/// The curve of an ECDSA host key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EcdsaCurve {
    NistP256,
    NistP384,
}

impl EcdsaCurve {
    /// Returns the curve identifier embedded in the public key.
    pub fn identifier(self) -> &'static str {
        match self {
            EcdsaCurve::NistP256 => "nistp256",
            EcdsaCurve::NistP384 => "nistp384",
        }
    }

    pub fn key_type(self) -> &'static str {
        match self {
            EcdsaCurve::NistP256 => ECDSA_SHA2_NISTP256,
            EcdsaCurve::NistP384 => ECDSA_SHA2_NISTP384,
        }
    }

    pub(crate) fn signing_algorithm(self) -> &'static signature::EcdsaSigningAlgorithm {
        match self {
            EcdsaCurve::NistP256 => &signature::ECDSA_P256_SHA256_FIXED_SIGNING,
            EcdsaCurve::NistP384 => &signature::ECDSA_P384_SHA384_FIXED_SIGNING,
        }
    }
}

/// A host key pair.
///
/// The private half is only ever used by a [`Signer`](crate::signature::Signer).
pub enum HostKeyPair {
    Ed25519(Ed25519KeyPair),
    Ecdsa {
        curve: EcdsaCurve,
        key: EcdsaKeyPair,
    },
    Rsa(RsaPrivateKey),
}

impl HostKeyPair {
    /// Load an Ed25519 key from a PKCS#8 document (v1 or v2).
    pub fn ed25519_from_pkcs8(pkcs8: &[u8]) -> Result<Self, crate::Error> {
        Ed25519KeyPair::from_pkcs8_maybe_unchecked(pkcs8)
            .map(HostKeyPair::Ed25519)
            .map_err(|err| crate::Error::key(format!("ed25519: {}", err)))
    }

    /// Load an ECDSA key from a PKCS#8 document.
    pub fn ecdsa_from_pkcs8(curve: EcdsaCurve, pkcs8: &[u8]) -> Result<Self, crate::Error> {
        EcdsaKeyPair::from_pkcs8(curve.signing_algorithm(), pkcs8)
            .map(|key| HostKeyPair::Ecdsa { curve, key })
            .map_err(|err| crate::Error::key(format!("{}: {}", curve.key_type(), err)))
    }

    /// Load an RSA key of at least 2048 bits from a PKCS#8 document.
    pub fn rsa_from_pkcs8(pkcs8: &[u8]) -> Result<Self, crate::Error> {
        let key = RsaPrivateKey::from_pkcs8_der(pkcs8)
            .map_err(|err| crate::Error::key(format!("rsa: {}", err)))?;
        let bits = key.size() * 8;
        if bits < RSA_MIN_MODULUS_BITS {
            return Err(crate::Error::key(format!("rsa: {}-bit modulus is too small", bits)));
        }
        Ok(HostKeyPair::Rsa(key))
    }

    /// Load a key from a PKCS#8 document, detecting its algorithm.
    pub fn from_pkcs8(pkcs8: &[u8]) -> Result<Self, crate::Error> {
        Self::ed25519_from_pkcs8(pkcs8)
            .or_else(|_| Self::ecdsa_from_pkcs8(EcdsaCurve::NistP256, pkcs8))
            .or_else(|_| Self::ecdsa_from_pkcs8(EcdsaCurve::NistP384, pkcs8))
            .or_else(|_| Self::rsa_from_pkcs8(pkcs8))
            .map_err(|_| crate::Error::key("unsupported or malformed PKCS#8 document"))
    }

    /// Returns the SSH key type name of the public key.
    pub fn key_type(&self) -> &'static str {
        match self {
            HostKeyPair::Ed25519(..) => SSH_ED25519,
            HostKeyPair::Ecdsa { curve, .. } => curve.key_type(),
            HostKeyPair::Rsa(..) => SSH_RSA,
        }
    }

    /// Writes the raw SSH encoding of the public key, without an outer length.
    pub fn put_public_key<B: BufMut>(&self, mut buf: B) {
        put_ssh_string(&mut buf, self.key_type().as_bytes());
        match self {
            HostKeyPair::Ed25519(key) => {
                put_ssh_string(&mut buf, key.public_key().as_ref());
            }
            HostKeyPair::Ecdsa { curve, key } => {
                put_ssh_string(&mut buf, curve.identifier().as_bytes());
                put_ssh_string(&mut buf, key.public_key().as_ref());
            }
            HostKeyPair::Rsa(key) => {
                put_ssh_mpint(&mut buf, &key.e().to_bytes_be()[..]);
                put_ssh_mpint(&mut buf, &key.n().to_bytes_be()[..]);
            }
        }
    }

    /// Returns the raw SSH encoding of the public key.
    pub fn public_key_blob(&self) -> Vec<u8> {
        let mut blob: Vec<u8> = vec![];
        self.put_public_key(&mut blob);
        blob
    }
}

impl fmt::Debug for HostKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostKeyPair")
            .field("key_type", &self.key_type())
            .finish()
    }
}
