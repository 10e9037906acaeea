//! The hasher: pre-image selection plus an injected digest provider.
//!
//! Text is hashed as its UTF-8 bytes and buffers as their exact byte window.
//! Every other value is canonicalized first, so structurally equal values
//! hash the same regardless of key order or container identity.

use std::borrow::Cow;

use easy_hash_core::{to_deterministic_json, ByteView, Heap, Value};
use easy_hash_digest::{AsyncDigestProvider, Digest, DigestProvider, RustCryptoProvider};
use tracing::debug;

use crate::config::HasherConfig;
use crate::error::{Result, ValidationError};

/// What gets hashed.
#[derive(Debug, Clone, Copy)]
pub enum HashInput<'a> {
    /// UTF-8 text, hashed directly.
    Text(&'a str),
    /// Raw bytes, hashed directly.
    Bytes(&'a [u8]),
    /// A buffer or typed view; only its window is hashed.
    Buffer(&'a ByteView),
    /// Any other value, hashed through its canonical form.
    Value { heap: &'a Heap, value: &'a Value },
}

impl<'a> HashInput<'a> {
    /// Route a value: strings and buffers are used directly, anything else
    /// is canonicalized.
    pub fn from_value(heap: &'a Heap, value: &'a Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s),
            Value::Buffer(view) => Self::Buffer(view),
            _ => Self::Value { heap, value },
        }
    }

    /// Accept only text and buffers.
    ///
    /// A plain object is rejected even when it carries a field that looks
    /// like a buffer.
    pub fn strict(heap: &'a Heap, value: &'a Value) -> std::result::Result<Self, ValidationError> {
        match value {
            Value::String(s) => Ok(Self::Text(s)),
            Value::Buffer(view) => Ok(Self::Buffer(view)),
            Value::Ref(id) => Err(ValidationError::NotABuffer {
                found: heap.get(*id).map_or("object", |node| node.kind_name()),
            }),
            other => Err(ValidationError::NotABuffer {
                found: other.type_name(),
            }),
        }
    }

    /// The bytes handed to the digest provider.
    pub fn to_bytes(&self) -> Cow<'a, [u8]> {
        match *self {
            Self::Text(s) => Cow::Borrowed(s.as_bytes()),
            Self::Bytes(b) => Cow::Borrowed(b),
            Self::Buffer(view) => Cow::Borrowed(view.as_bytes()),
            Self::Value { heap, value } => Cow::Owned(to_deterministic_json(heap, value).into_bytes()),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Buffer(_) => "buffer",
            Self::Value { .. } => "canonical",
        }
    }
}

impl<'a> From<&'a str> for HashInput<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

impl<'a> From<&'a String> for HashInput<'a> {
    fn from(s: &'a String) -> Self {
        Self::Text(s)
    }
}

impl<'a> From<&'a [u8]> for HashInput<'a> {
    fn from(b: &'a [u8]) -> Self {
        Self::Bytes(b)
    }
}

impl<'a> From<&'a ByteView> for HashInput<'a> {
    fn from(view: &'a ByteView) -> Self {
        Self::Buffer(view)
    }
}

/// Hashes inputs with a digest provider chosen at construction.
#[derive(Debug, Clone)]
pub struct Hasher<P = RustCryptoProvider> {
    provider: P,
    config: HasherConfig,
}

impl Hasher<RustCryptoProvider> {
    /// Native provider, SHA-256 default.
    pub fn native() -> Self {
        Self::new(RustCryptoProvider::new(), HasherConfig::default())
    }

    /// Native provider, SHA-1 default.
    pub fn legacy() -> Self {
        Self::new(RustCryptoProvider::new(), HasherConfig::legacy())
    }
}

impl Default for Hasher<RustCryptoProvider> {
    fn default() -> Self {
        Self::native()
    }
}

impl<P> Hasher<P> {
    pub fn new(provider: P, config: HasherConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &HasherConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn algorithm_name<'n>(&self, algorithm: Option<&'n str>) -> &'n str {
        algorithm.unwrap_or(self.config.default_algorithm.name())
    }
}

impl<P: DigestProvider> Hasher<P> {
    /// Digest with the configured default algorithm.
    pub fn digest<'a>(&self, input: impl Into<HashInput<'a>>) -> Result<Digest> {
        self.run(input.into(), None)
    }

    /// Digest with a named algorithm. Unknown names fail with the provider's error.
    pub fn digest_with<'a>(&self, input: impl Into<HashInput<'a>>, algorithm: &str) -> Result<Digest> {
        self.run(input.into(), Some(algorithm))
    }

    pub fn hex<'a>(&self, input: impl Into<HashInput<'a>>) -> Result<String> {
        self.digest(input).map(|d| d.to_hex())
    }

    pub fn hex_with<'a>(&self, input: impl Into<HashInput<'a>>, algorithm: &str) -> Result<String> {
        self.digest_with(input, algorithm).map(|d| d.to_hex())
    }

    fn run(&self, input: HashInput<'_>, algorithm: Option<&str>) -> Result<Digest> {
        let algorithm = self.algorithm_name(algorithm);
        let bytes = input.to_bytes();
        debug!(algorithm, input = input.label(), len = bytes.len(), "hashing");
        let out = self.provider.digest(algorithm, &bytes)?;
        Ok(Digest::from_bytes(out))
    }
}

impl<P: AsyncDigestProvider> Hasher<P> {
    /// Digest through the async provider. `None` selects the configured default.
    pub async fn digest_async(&self, input: HashInput<'_>, algorithm: Option<&str>) -> Result<Digest> {
        let algorithm = self.algorithm_name(algorithm);
        let bytes = input.to_bytes();
        debug!(algorithm, input = input.label(), len = bytes.len(), "hashing async");
        let out = self.provider.digest_async(algorithm, &bytes).await?;
        Ok(Digest::from_bytes(out))
    }

    pub async fn hex_async(&self, input: HashInput<'_>, algorithm: Option<&str>) -> Result<String> {
        self.digest_async(input, algorithm).await.map(|d| d.to_hex())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Convenience entry points
// ─────────────────────────────────────────────────────────────────────────────

/// SHA-256 hex of any value. Strings are hashed as-is, everything else
/// through its canonical form.
pub fn easy_hash(heap: &Heap, value: &Value) -> Result<String> {
    Hasher::native().hex(HashInput::from_value(heap, value))
}

/// Like [`easy_hash`] with a named algorithm.
pub fn easy_hash_with(heap: &Heap, value: &Value, algorithm: &str) -> Result<String> {
    Hasher::native().hex_with(HashInput::from_value(heap, value), algorithm)
}

/// Hex digest of the UTF-8 bytes of `text`.
pub fn basic_hash(text: &str, algorithm: &str) -> Result<String> {
    Hasher::native().hex_with(text, algorithm)
}

/// Digest of a string or buffer. Any other value is rejected.
pub fn buffer_hash(heap: &Heap, value: &Value, algorithm: &str) -> Result<Digest> {
    let input = HashInput::strict(heap, value)?;
    Hasher::native().digest_with(input, algorithm)
}

/// Hex digest of a string or buffer. Any other value is rejected.
pub fn browser_hash(heap: &Heap, value: &Value, algorithm: &str) -> Result<String> {
    buffer_hash(heap, value, algorithm).map(|d| d.to_hex())
}

/// SHA-1 hex of any value, for digests produced by older releases.
pub fn legacy_hash(heap: &Heap, value: &Value) -> Result<String> {
    Hasher::legacy().hex(HashInput::from_value(heap, value))
}
