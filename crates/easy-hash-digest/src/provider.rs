//! Digest providers.
//!
//! A provider turns `(algorithm name, bytes)` into raw digest bytes. The
//! hasher never computes digests itself; it delegates to whatever provider
//! it was built with, so platform primitives can be swapped in.

use async_trait::async_trait;
use sha1::Sha1;
use sha2::{Digest as _, Sha256, Sha384, Sha512};

use crate::algorithm::DigestAlgorithm;
use crate::error::Result;

/// Synchronous digest primitive.
///
/// Implementations must be pure: the same name and bytes always yield the
/// same output. Unknown names return [`DigestError::UnsupportedAlgorithm`].
///
/// [`DigestError::UnsupportedAlgorithm`]: crate::DigestError::UnsupportedAlgorithm
pub trait DigestProvider: Send + Sync {
    fn digest(&self, algorithm: &str, data: &[u8]) -> Result<Vec<u8>>;
}

/// Asynchronous digest primitive, for platforms whose hashing API is async.
///
/// Every [`DigestProvider`] is also an `AsyncDigestProvider` that completes
/// immediately.
#[async_trait]
pub trait AsyncDigestProvider: Send + Sync {
    async fn digest_async(&self, algorithm: &str, data: &[u8]) -> Result<Vec<u8>>;
}

#[async_trait]
impl<P: DigestProvider> AsyncDigestProvider for P {
    async fn digest_async(&self, algorithm: &str, data: &[u8]) -> Result<Vec<u8>> {
        self.digest(algorithm, data)
    }
}

impl<P: DigestProvider + ?Sized> DigestProvider for &P {
    fn digest(&self, algorithm: &str, data: &[u8]) -> Result<Vec<u8>> {
        (**self).digest(algorithm, data)
    }
}

/// Native provider backed by the RustCrypto hashes and BLAKE3.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoProvider;

impl RustCryptoProvider {
    pub fn new() -> Self {
        Self
    }

    /// Digest with an already-parsed algorithm. Infallible.
    pub fn digest_with(&self, algorithm: DigestAlgorithm, data: &[u8]) -> Vec<u8> {
        match algorithm {
            DigestAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
            DigestAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
            DigestAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
            DigestAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
            DigestAlgorithm::Blake3 => blake3::hash(data).as_bytes().to_vec(),
        }
    }
}

impl DigestProvider for RustCryptoProvider {
    fn digest(&self, algorithm: &str, data: &[u8]) -> Result<Vec<u8>> {
        let algorithm: DigestAlgorithm = algorithm.parse()?;
        Ok(self.digest_with(algorithm, data))
    }
}
