//! Error types for point construction and (de)serialization.
//!
//! Every stream-level error carries structured side data recording how far
//! the operation got ([`ReadErrorData`] / [`WriteErrorData`]), so callers can
//! account for consumed bytes even on failure.

use std::io;

use thiserror::Error;

/// Side data attached to every deserialization error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadErrorData {
    /// Whether the failing read consumed some, but not all, requested bytes.
    pub partial_read: bool,
    /// Bytes consumed for the current point before the error, including
    /// earlier fully-read words.
    pub bytes_read: usize,
    /// The bytes the failing read actually observed, if any.
    pub actually_read: Vec<u8>,
    /// The bytes the reader expected to observe, where applicable.
    pub expected: Vec<u8>,
}

/// Side data attached to every serialization error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteErrorData {
    /// Whether the failing write consumed some, but not all, of the payload.
    pub partial_write: bool,
    /// Bytes written for the current point before the error.
    pub bytes_written: usize,
    /// A copy of the payload the writer was asked to emit.
    pub data: Vec<u8>,
}

/// Errors from reconstructing curve points out of coordinate data.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CurveError {
    /// The x coordinate does not correspond to any point on the curve.
    #[error("x coordinate is not on the curve")]
    XNotOnCurve,
    /// The x coordinate corresponds to curve points, but none of them lies
    /// in the prime-order subgroup.
    #[error("x coordinate is on the curve but outside the prime-order subgroup")]
    XNotInSubgroup,
    /// The y coordinate does not correspond to any point on the curve.
    #[error("y coordinate is not on the curve")]
    YNotOnCurve,
    /// The coordinates do not satisfy the curve equation.
    #[error("coordinates do not satisfy the curve equation")]
    NotOnCurve,
    /// The point is on the curve but outside the prime-order subgroup.
    #[error("point is on the curve but outside the prime-order subgroup")]
    NotInSubgroup,
    /// A sign parameter was outside its allowed range.
    #[error("invalid sign value {0}")]
    InvalidSign(i32),
    /// A zero sign for x was given for a y coordinate other than ±1.
    #[error("sign of x may only be zero for y = 1 or y = -1")]
    InvalidZeroSignX,
    /// A sign bit was set for a zero coordinate, which has no canonical
    /// negative encoding.
    #[error("sign bit is set for a zero coordinate")]
    UnexpectedNegativeZero,
    /// The decoded `y·sign(y)` value was not positive.
    #[error("y*sign(y) must have positive sign")]
    WrongSignY,
    /// The coordinates describe the not-a-point sentinel.
    #[error("coordinates describe a NaP")]
    CannotDeserializeNaP,
    /// Both coordinates are zero. A refinement of
    /// [`CannotDeserializeNaP`](Self::CannotDeserializeNaP).
    #[error("x and y coordinates are both zero")]
    XYAllZero,
}

impl CurveError {
    /// Whether this error rejects a NaP encoding. [`CurveError::XYAllZero`]
    /// refines [`CurveError::CannotDeserializeNaP`]; both answer true.
    pub fn is_nap_rejection(&self) -> bool {
        matches!(self, Self::CannotDeserializeNaP | Self::XYAllZero)
    }
}

/// Errors from serializing a curve point to a byte stream.
#[derive(Debug, Error)]
pub enum SerializationError {
    /// The point is the NaP sentinel.
    #[error("cannot serialize a NaP")]
    CannotSerializeNaP,
    /// The point is one of the two points at infinity.
    #[error("cannot serialize a point at infinity")]
    CannotSerializePointAtInfinity,
    /// The serializer only emits subgroup points and the point is outside
    /// the prime-order subgroup.
    #[error("will not serialize a point outside the prime-order subgroup")]
    PointOutsideSubgroup,
    /// The underlying writer failed.
    #[error("i/o error while writing a curve point")]
    Io {
        /// The writer's error.
        #[source]
        source: io::Error,
        /// Write accounting and the attempted payload.
        data: WriteErrorData,
    },
}

impl SerializationError {
    /// Bytes written for the current point before the error. Zero for the
    /// refusal variants, which never touch the stream.
    pub fn bytes_written(&self) -> usize {
        match self {
            Self::Io { data, .. } => data.bytes_written,
            _ => 0,
        }
    }

    /// Accounts for `n` bytes written by earlier words of the same point.
    pub(crate) fn offset_written(mut self, n: usize) -> Self {
        if let Self::Io { data, .. } = &mut self {
            data.bytes_written += n;
        }
        self
    }
}

/// Errors from deserializing a curve point out of a byte stream.
#[derive(Debug, Error)]
pub enum DeserializationError {
    /// The stream was already exhausted when the read started.
    #[error("end of stream")]
    Eof {
        /// Read accounting.
        data: ReadErrorData,
    },
    /// The stream ended part-way through the read.
    #[error("unexpected end of stream")]
    UnexpectedEof {
        /// Read accounting.
        data: ReadErrorData,
    },
    /// The underlying reader failed.
    #[error("i/o error while reading a curve point")]
    Io {
        /// The reader's error.
        #[source]
        source: io::Error,
        /// Read accounting.
        data: ReadErrorData,
    },
    /// The observed bytes did not match the expected header bits.
    #[error("header mismatch")]
    HeaderMismatch {
        /// Read accounting; `expected` and `actually_read` hold the
        /// mismatching byte patterns.
        data: ReadErrorData,
    },
    /// The encoded integer is not a canonical field element.
    #[error("encoded value exceeds the field size")]
    ValueExceedsFieldSize {
        /// Read accounting.
        data: ReadErrorData,
    },
    /// The decoded coordinates do not describe a valid point.
    #[error("invalid curve point encoding")]
    Curve {
        /// The coordinate-level failure.
        #[source]
        source: CurveError,
        /// Read accounting.
        data: ReadErrorData,
    },
}

impl DeserializationError {
    /// The read accounting attached to this error.
    pub fn read_data(&self) -> &ReadErrorData {
        match self {
            Self::Eof { data }
            | Self::UnexpectedEof { data }
            | Self::Io { data, .. }
            | Self::HeaderMismatch { data }
            | Self::ValueExceedsFieldSize { data }
            | Self::Curve { data, .. } => data,
        }
    }

    /// The coordinate-level failure, if this error wraps one.
    pub fn curve_error(&self) -> Option<CurveError> {
        match self {
            Self::Curve { source, .. } => Some(*source),
            _ => None,
        }
    }

    fn data_mut(&mut self) -> &mut ReadErrorData {
        match self {
            Self::Eof { data }
            | Self::UnexpectedEof { data }
            | Self::Io { data, .. }
            | Self::HeaderMismatch { data }
            | Self::ValueExceedsFieldSize { data }
            | Self::Curve { data, .. } => data,
        }
    }

    /// Accounts for `n` bytes consumed by earlier words of the same point.
    pub(crate) fn offset_read(mut self, n: usize) -> Self {
        self.data_mut().bytes_read += n;
        self
    }

    /// Records the bytes the caller expected the stream to contain.
    pub(crate) fn with_expected(mut self, expected: &[u8]) -> Self {
        self.data_mut().expected = expected.to_vec();
        self
    }
}
