//! Encoding of field elements into 32-byte words with embedded header and
//! sign bits.
//!
//! The logical layout is defined on the big-endian interpretation of the
//! word: header bits occupy the most significant positions, an optional
//! sign bit comes next, and the canonical integer representative of the
//! field element fills the rest. Only the final byte order on the wire
//! depends on the configured endianness.

use std::io::{Read, Write};

use crypto_bigint::{Encoding, U256};

use crate::errors::{DeserializationError, ReadErrorData, SerializationError};
use crate::field::FieldElement;
use crate::serializer::{read_full, write_full, BitHeader, Endianness};

/// Length of one encoded field element.
pub(crate) const WORD_LENGTH: usize = 32;

fn value_exceeds_field_size(word: &[u8; WORD_LENGTH]) -> DeserializationError {
    DeserializationError::ValueExceedsFieldSize {
        data: ReadErrorData {
            partial_read: false,
            bytes_read: WORD_LENGTH,
            actually_read: word.to_vec(),
            expected: Vec::new(),
        },
    }
}

/// One field element behind a fixed bit header.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct HeaderFieldSerializer {
    pub endianness: Endianness,
    pub header: BitHeader,
}

impl HeaderFieldSerializer {
    /// Writes the element as one 32-byte word. The element's canonical
    /// representative must leave the header bits clear; the point
    /// serializers guarantee this (a 1-bit header always fits below a
    /// 255-bit field, a 2-bit header only ever fronts positive-sign
    /// values).
    pub fn serialize<W: Write + ?Sized>(
        &self,
        writer: &mut W,
        value: &FieldElement,
    ) -> Result<usize, SerializationError> {
        let mut word = value.to_uint().to_be_bytes();
        assert!(
            self.header.extract(word[0]) == 0,
            "field element does not fit below the bit header"
        );
        word[0] = self.header.apply(word[0]);
        if self.endianness == Endianness::Little {
            word.reverse();
        }
        write_full(writer, &word)
    }

    /// Reads one 32-byte word, verifies the header bits, and parses the
    /// remaining bits as a canonical field element.
    pub fn deserialize<R: Read + ?Sized>(
        &self,
        reader: &mut R,
    ) -> Result<(FieldElement, usize), DeserializationError> {
        let mut word = [0u8; WORD_LENGTH];
        read_full(reader, &mut word)?;
        if self.endianness == Endianness::Little {
            word.reverse();
        }
        if self.header.extract(word[0]) != self.header.prefix_bits() {
            return Err(DeserializationError::HeaderMismatch {
                data: ReadErrorData {
                    partial_read: false,
                    bytes_read: WORD_LENGTH,
                    actually_read: vec![word[0]],
                    expected: vec![self.header.leading_byte()],
                },
            });
        }
        word[0] = self.header.clear(word[0]);
        let integer = U256::from_be_slice(&word);
        match FieldElement::from_uint(&integer) {
            Some(value) => Ok((value, WORD_LENGTH)),
            None => Err(value_exceeds_field_size(&word)),
        }
    }
}

/// One field element with a sign bit in the most significant big-endian
/// position. The 255-bit field leaves exactly that one bit free, so this
/// layout admits no additional header.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SignBitFieldSerializer {
    pub endianness: Endianness,
}

impl SignBitFieldSerializer {
    const SIGN_BIT: u8 = 0x80;

    /// Writes the element with the given sign bit in the top position.
    pub fn serialize<W: Write + ?Sized>(
        &self,
        writer: &mut W,
        value: &FieldElement,
        sign_bit: bool,
    ) -> Result<usize, SerializationError> {
        let mut word = value.to_uint().to_be_bytes();
        // Canonical representatives are below 2^255, so the top bit is
        // always clear here.
        if sign_bit {
            word[0] |= Self::SIGN_BIT;
        }
        if self.endianness == Endianness::Little {
            word.reverse();
        }
        write_full(writer, &word)
    }

    /// Reads one word and splits it into the field element and the sign
    /// bit.
    pub fn deserialize<R: Read + ?Sized>(
        &self,
        reader: &mut R,
    ) -> Result<(FieldElement, bool, usize), DeserializationError> {
        let mut word = [0u8; WORD_LENGTH];
        read_full(reader, &mut word)?;
        if self.endianness == Endianness::Little {
            word.reverse();
        }
        let sign_bit = word[0] & Self::SIGN_BIT != 0;
        word[0] &= !Self::SIGN_BIT;
        let integer = U256::from_be_slice(&word);
        match FieldElement::from_uint(&integer) {
            Some(value) => Ok((value, sign_bit, WORD_LENGTH)),
            None => Err(value_exceeds_field_size(&word)),
        }
    }
}

/// Two consecutive headed field elements.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DoubleHeaderFieldSerializer {
    pub endianness: Endianness,
    pub header1: BitHeader,
    pub header2: BitHeader,
}

impl DoubleHeaderFieldSerializer {
    fn first(&self) -> HeaderFieldSerializer {
        HeaderFieldSerializer {
            endianness: self.endianness,
            header: self.header1,
        }
    }

    fn second(&self) -> HeaderFieldSerializer {
        HeaderFieldSerializer {
            endianness: self.endianness,
            header: self.header2,
        }
    }

    /// Writes both elements; errors from the second word account for the
    /// bytes of the first.
    pub fn serialize<W: Write + ?Sized>(
        &self,
        writer: &mut W,
        first: &FieldElement,
        second: &FieldElement,
    ) -> Result<usize, SerializationError> {
        let written = self.first().serialize(writer, first)?;
        match self.second().serialize(writer, second) {
            Ok(n) => Ok(written + n),
            Err(e) => Err(e.offset_written(written)),
        }
    }

    /// Reads both elements in order.
    pub fn deserialize<R: Read + ?Sized>(
        &self,
        reader: &mut R,
    ) -> Result<(FieldElement, FieldElement, usize), DeserializationError> {
        let (first, read) = self.first().deserialize(reader)?;
        match self.second().deserialize(reader) {
            Ok((second, n)) => Ok((first, second, read + n)),
            Err(e) => Err(e.offset_read(read)),
        }
    }
}
