//! Byte views: raw buffers and typed windows over them.
//!
//! A [`ByteView`] is the only value category accepted by strict-buffer
//! hashing. Its bytes are always the declared window, never the whole
//! backing buffer.

use bytes::Bytes;
use std::fmt;

use crate::error::ViewError;

/// The kind of byte container a view represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    ArrayBuffer,
    DataView,
    Int8Array,
    Uint8Array,
    Uint8ClampedArray,
    Int16Array,
    Uint16Array,
    Int32Array,
    Uint32Array,
    Float32Array,
    Float64Array,
    BigInt64Array,
    BigUint64Array,
}

impl BufferKind {
    /// Width in bytes of one element. Raw buffers and data views are byte-addressed.
    pub const fn element_width(self) -> usize {
        match self {
            Self::ArrayBuffer
            | Self::DataView
            | Self::Int8Array
            | Self::Uint8Array
            | Self::Uint8ClampedArray => 1,
            Self::Int16Array | Self::Uint16Array => 2,
            Self::Int32Array | Self::Uint32Array | Self::Float32Array => 4,
            Self::Float64Array | Self::BigInt64Array | Self::BigUint64Array => 8,
        }
    }

    /// The type name used in canonical sentinels.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ArrayBuffer => "ArrayBuffer",
            Self::DataView => "DataView",
            Self::Int8Array => "Int8Array",
            Self::Uint8Array => "Uint8Array",
            Self::Uint8ClampedArray => "Uint8ClampedArray",
            Self::Int16Array => "Int16Array",
            Self::Uint16Array => "Uint16Array",
            Self::Int32Array => "Int32Array",
            Self::Uint32Array => "Uint32Array",
            Self::Float32Array => "Float32Array",
            Self::Float64Array => "Float64Array",
            Self::BigInt64Array => "BigInt64Array",
            Self::BigUint64Array => "BigUint64Array",
        }
    }

    /// Check if this is one of the typed-array kinds.
    pub const fn is_typed_array(self) -> bool {
        !matches!(self, Self::ArrayBuffer | Self::DataView)
    }
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A window over a shared byte buffer.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ByteView {
    kind: BufferKind,
    buffer: Bytes,
    byte_offset: usize,
    byte_length: usize,
}

impl ByteView {
    /// A raw buffer spanning all of `bytes`.
    pub fn array_buffer(bytes: impl Into<Bytes>) -> Self {
        Self::spanning(BufferKind::ArrayBuffer, bytes.into())
    }

    /// A `Uint8Array` spanning all of `bytes`.
    pub fn uint8(bytes: impl Into<Bytes>) -> Self {
        Self::spanning(BufferKind::Uint8Array, bytes.into())
    }

    /// UTF-8 encode a string into a fresh `Uint8Array`.
    pub fn from_utf8(s: &str) -> Self {
        Self::uint8(Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Create a view of `kind` over `byte_length` bytes starting at `byte_offset`.
    ///
    /// Typed-array windows must start and end on an element boundary.
    pub fn new(
        kind: BufferKind,
        buffer: Bytes,
        byte_offset: usize,
        byte_length: usize,
    ) -> Result<Self, ViewError> {
        let end = byte_offset.checked_add(byte_length);
        if end.map_or(true, |end| end > buffer.len()) {
            return Err(ViewError::OutOfBounds {
                offset: byte_offset,
                length: byte_length,
                buffer_len: buffer.len(),
            });
        }

        let width = kind.element_width();
        if byte_offset % width != 0 || byte_length % width != 0 {
            return Err(ViewError::Misaligned {
                kind: kind.name(),
                width,
                offset: byte_offset,
                length: byte_length,
            });
        }

        Ok(Self {
            kind,
            buffer,
            byte_offset,
            byte_length,
        })
    }

    /// Create a view of `kind` over the whole buffer.
    pub fn whole(kind: BufferKind, buffer: Bytes) -> Result<Self, ViewError> {
        let len = buffer.len();
        Self::new(kind, buffer, 0, len)
    }

    fn spanning(kind: BufferKind, buffer: Bytes) -> Self {
        let byte_length = buffer.len();
        Self {
            kind,
            buffer,
            byte_offset: 0,
            byte_length,
        }
    }

    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    pub fn byte_length(&self) -> usize {
        self.byte_length
    }

    /// The full backing buffer, including bytes outside this view.
    pub fn buffer(&self) -> &Bytes {
        &self.buffer
    }

    /// The bytes inside this view's window.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[self.byte_offset..self.byte_offset + self.byte_length]
    }

    pub fn len(&self) -> usize {
        self.byte_length
    }

    pub fn is_empty(&self) -> bool {
        self.byte_length == 0
    }

    /// Lowercase hex of the window.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}+{}]({})",
            self.kind,
            self.byte_offset,
            self.byte_length,
            self.to_hex()
        )
    }
}

impl AsRef<[u8]> for ByteView {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_excludes_bytes_outside_view() {
        let buffer = Bytes::from_static(b"xxIshmaelyy");
        let view = ByteView::new(BufferKind::Uint8Array, buffer, 2, 7).unwrap();
        assert_eq!(view.as_bytes(), b"Ishmael");
        assert_eq!(view.buffer().len(), 11);
    }

    #[test]
    fn test_out_of_bounds_window_rejected() {
        let buffer = Bytes::from_static(b"Pequod");
        let err = ByteView::new(BufferKind::DataView, buffer, 4, 4).unwrap_err();
        assert_eq!(
            err,
            ViewError::OutOfBounds {
                offset: 4,
                length: 4,
                buffer_len: 6
            }
        );
    }

    #[test]
    fn test_overflowing_window_rejected() {
        let buffer = Bytes::from_static(b"Pequod");
        assert!(ByteView::new(BufferKind::Uint8Array, buffer, usize::MAX, 2).is_err());
    }

    #[test]
    fn test_misaligned_typed_window_rejected() {
        let buffer = Bytes::from_static(&[0u8; 8]);
        assert!(ByteView::new(BufferKind::Uint16Array, buffer.clone(), 1, 2).is_err());
        assert!(ByteView::new(BufferKind::Uint32Array, buffer.clone(), 0, 6).is_err());
        assert!(ByteView::new(BufferKind::Uint32Array, buffer.clone(), 4, 4).is_ok());
        // Data views are byte-addressed.
        assert!(ByteView::new(BufferKind::DataView, buffer, 3, 3).is_ok());
    }

    #[test]
    fn test_from_utf8() {
        let view = ByteView::from_utf8("Ishmael");
        assert_eq!(view.kind(), BufferKind::Uint8Array);
        assert_eq!(view.as_bytes(), &[73, 115, 104, 109, 97, 101, 108]);
        assert_eq!(view.to_hex(), "4973686d61656c");
        assert!(ByteView::from_utf8("").is_empty());
    }

    #[test]
    fn test_element_widths() {
        assert_eq!(BufferKind::Uint8ClampedArray.element_width(), 1);
        assert_eq!(BufferKind::Int16Array.element_width(), 2);
        assert_eq!(BufferKind::Float32Array.element_width(), 4);
        assert_eq!(BufferKind::BigUint64Array.element_width(), 8);
        assert!(!BufferKind::DataView.is_typed_array());
        assert!(BufferKind::Float64Array.is_typed_array());
    }
}
