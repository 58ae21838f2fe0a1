//! Signature algorithms used to sign authentication requests.

// Refs:
// * https://tools.ietf.org/html/rfc4253#section-6.6
// * https://tools.ietf.org/html/rfc5656#section-3.1.2
// * https://tools.ietf.org/html/rfc8332
// * https://tools.ietf.org/html/rfc8709#section-6
// * https://tools.ietf.org/html/rfc4252#section-9

use crate::{
    keys::{self, EcdsaCurve, HostKeyPair},
    util::{put_ssh_mpint, put_ssh_string},
};
use ring::{rand::SystemRandom, signature};
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha1::Sha1;
use sha2::{Digest as _, Sha256, Sha512};
use std::{fmt, sync::Arc};

/// Produces signatures with a private host key.
pub trait Signer: Send {
    /// Returns the name of the signature algorithm.
    fn algorithm(&self) -> &str;

    /// Sign `data` with the private half of `key`, returning the SSH encoded
    /// signature blob (`string` algorithm name followed by `string` signature).
    fn sign(&self, key: &HostKeyPair, data: &[u8]) -> Result<Vec<u8>, crate::Error>;
}

/// A named constructor of [`Signer`]s.
pub trait SignatureFactory: Send + Sync {
    /// Returns the name of the signature algorithm.
    fn name(&self) -> &str;

    /// Returns the key type this algorithm signs with.
    fn key_type(&self) -> &str;

    /// Create a signer, or `None` if the algorithm is not usable.
    fn create(&self) -> Option<Box<dyn Signer>>;
}

/// The signature algorithms implemented by this crate.
///
/// Ed25519 and ECDSA are signed with `ring`, RSA with the `rsa` crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltinSignature {
    Ed25519,
    EcdsaNistP256,
    EcdsaNistP384,
    /// `ssh-rsa`, PKCS#1 v1.5 over SHA-1.
    SshRsa,
    RsaSha2_256,
    RsaSha2_512,
}

impl BuiltinSignature {
    pub fn algorithm_name(self) -> &'static str {
        match self {
            BuiltinSignature::Ed25519 => keys::SSH_ED25519,
            BuiltinSignature::EcdsaNistP256 => keys::ECDSA_SHA2_NISTP256,
            BuiltinSignature::EcdsaNistP384 => keys::ECDSA_SHA2_NISTP384,
            BuiltinSignature::SshRsa => keys::SSH_RSA,
            BuiltinSignature::RsaSha2_256 => "rsa-sha2-256",
            BuiltinSignature::RsaSha2_512 => "rsa-sha2-512",
        }
    }
}

impl SignatureFactory for BuiltinSignature {
    fn name(&self) -> &str {
        self.algorithm_name()
    }

    fn key_type(&self) -> &str {
        match self {
            BuiltinSignature::Ed25519 => keys::SSH_ED25519,
            BuiltinSignature::EcdsaNistP256 => keys::ECDSA_SHA2_NISTP256,
            BuiltinSignature::EcdsaNistP384 => keys::ECDSA_SHA2_NISTP384,
            BuiltinSignature::SshRsa
            | BuiltinSignature::RsaSha2_256
            | BuiltinSignature::RsaSha2_512 => keys::SSH_RSA,
        }
    }

    fn create(&self) -> Option<Box<dyn Signer>> {
        Some(Box::new(BuiltinSigner {
            algorithm: *self,
            rng: SystemRandom::new(),
        }))
    }
}

struct BuiltinSigner {
    algorithm: BuiltinSignature,
    rng: SystemRandom,
}

impl BuiltinSigner {
    fn sign_ecdsa(
        &self,
        curve: EcdsaCurve,
        key: &signature::EcdsaKeyPair,
        data: &[u8],
    ) -> Result<Vec<u8>, crate::Error> {
        let sig = key
            .sign(&self.rng, data)
            .map_err(|_| crate::Error::sign(curve.key_type()))?;

        // the fixed encoding is r || s, each as wide as the curve order
        let (r, s) = sig.as_ref().split_at(sig.as_ref().len() / 2);
        let mut rs: Vec<u8> = vec![];
        put_ssh_mpint(&mut rs, r);
        put_ssh_mpint(&mut rs, s);
        Ok(rs)
    }

    /// PKCS#1 v1.5 signature over an already hashed message, as wide as the modulus.
    fn sign_rsa(
        &self,
        key: &RsaPrivateKey,
        padding: Pkcs1v15Sign,
        hashed: &[u8],
    ) -> Result<Vec<u8>, crate::Error> {
        key.sign(padding, hashed).map_err(|err| {
            crate::Error::sign(format!("{}: {}", self.algorithm.algorithm_name(), err))
        })
    }
}

impl Signer for BuiltinSigner {
    fn algorithm(&self) -> &str {
        self.algorithm.algorithm_name()
    }

    fn sign(&self, key: &HostKeyPair, data: &[u8]) -> Result<Vec<u8>, crate::Error> {
        let sig = match (self.algorithm, key) {
            (BuiltinSignature::Ed25519, HostKeyPair::Ed25519(key)) => key.sign(data).as_ref().to_vec(),
            (BuiltinSignature::EcdsaNistP256, HostKeyPair::Ecdsa { curve, key })
                if *curve == EcdsaCurve::NistP256 =>
            {
                self.sign_ecdsa(*curve, key, data)?
            }
            (BuiltinSignature::EcdsaNistP384, HostKeyPair::Ecdsa { curve, key })
                if *curve == EcdsaCurve::NistP384 =>
            {
                self.sign_ecdsa(*curve, key, data)?
            }
            (BuiltinSignature::SshRsa, HostKeyPair::Rsa(key)) => {
                self.sign_rsa(key, Pkcs1v15Sign::new::<Sha1>(), &Sha1::digest(data)[..])?
            }
            (BuiltinSignature::RsaSha2_256, HostKeyPair::Rsa(key)) => {
                self.sign_rsa(key, Pkcs1v15Sign::new::<Sha256>(), &Sha256::digest(data)[..])?
            }
            (BuiltinSignature::RsaSha2_512, HostKeyPair::Rsa(key)) => {
                self.sign_rsa(key, Pkcs1v15Sign::new::<Sha512>(), &Sha512::digest(data)[..])?
            }
            (algorithm, key) => {
                return Err(crate::Error::sign(format!(
                    "{} cannot sign with a {} key",
                    algorithm.algorithm_name(),
                    key.key_type()
                )));
            }
        };

        let mut blob: Vec<u8> = vec![];
        put_ssh_string(&mut blob, self.algorithm().as_bytes());
        put_ssh_string(&mut blob, &sig[..]);
        Ok(blob)
    }
}

/// An ordered set of signature algorithms.
///
/// Earlier entries are preferred when several algorithms can sign with the
/// same key type.
#[derive(Clone, Default)]
pub struct SignatureFactories {
    factories: Vec<Arc<dyn SignatureFactory>>,
}

impl SignatureFactories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the default algorithms, one per supported key type.
    ///
    /// Each one is named after the key type it signs for. The RFC 8332
    /// `rsa-sha2-*` algorithms are opt-in through [`BuiltinSignature`].
    pub fn builtin() -> Self {
        Self::new()
            .with(BuiltinSignature::Ed25519)
            .with(BuiltinSignature::EcdsaNistP256)
            .with(BuiltinSignature::EcdsaNistP384)
            .with(BuiltinSignature::SshRsa)
    }

    pub fn with(mut self, factory: impl SignatureFactory + 'static) -> Self {
        self.push(factory);
        self
    }

    pub fn push(&mut self, factory: impl SignatureFactory + 'static) {
        self.factories.push(Arc::new(factory));
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.factories.iter().map(|factory| factory.name())
    }

    /// Select the signer for a key type.
    ///
    /// The first algorithm whose key type matches wins.
    pub fn resolve(&self, key_type: &str) -> Result<Box<dyn Signer>, crate::Error> {
        let factory = self
            .factories
            .iter()
            .find(|factory| factory.key_type() == key_type)
            .ok_or_else(|| crate::Error::no_matching_algorithm(key_type))?;

        factory
            .create()
            .ok_or_else(|| crate::Error::no_signer(factory.name()))
    }
}

impl fmt::Debug for SignatureFactories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Returns the method's own algorithm preference if set and non-empty,
/// otherwise the algorithms of the session.
pub fn resolve_signature_factories<'a>(
    preferred: Option<&'a SignatureFactories>,
    session: &'a SignatureFactories,
) -> &'a SignatureFactories {
    preferred
        .filter(|factories| !factories.is_empty())
        .unwrap_or(session)
}
