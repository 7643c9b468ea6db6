//! Fixed-length stream reads and writes with byte-exact error accounting.

use std::io::{self, Read, Write};

use crate::errors::{DeserializationError, ReadErrorData, SerializationError, WriteErrorData};

/// Fills `buf` from the reader, retrying on interruption.
///
/// End of stream before the first byte yields
/// [`DeserializationError::Eof`]; after at least one byte,
/// [`DeserializationError::UnexpectedEof`] with `partial_read` set. Other
/// reader failures are wrapped with the byte count observed so far.
pub fn read_full<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut [u8],
) -> Result<usize, DeserializationError> {
    assert!(
        buf.len() <= i32::MAX as usize,
        "read length exceeds i32::MAX"
    );
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                let data = ReadErrorData {
                    partial_read: filled > 0,
                    bytes_read: filled,
                    actually_read: buf[..filled].to_vec(),
                    expected: Vec::new(),
                };
                return Err(if filled == 0 {
                    DeserializationError::Eof { data }
                } else {
                    DeserializationError::UnexpectedEof { data }
                });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(DeserializationError::Io {
                    source: e,
                    data: ReadErrorData {
                        partial_read: filled > 0,
                        bytes_read: filled,
                        actually_read: buf[..filled].to_vec(),
                        expected: Vec::new(),
                    },
                });
            }
        }
    }
    Ok(buf.len())
}

/// Reads `expected.len()` bytes and compares them against `expected`.
///
/// The full read is always attempted, even when a mismatch is already
/// visible early in the stream: predictable stream positioning is worth
/// more than saving the read. A mismatch after a complete read yields
/// [`DeserializationError::HeaderMismatch`] with both byte strings
/// attached; read failures carry the expected bytes as well.
pub fn consume_expected_bytes<R: Read + ?Sized>(
    reader: &mut R,
    expected: &[u8],
) -> Result<usize, DeserializationError> {
    assert!(
        expected.len() <= i32::MAX as usize,
        "read length exceeds i32::MAX"
    );
    if expected.is_empty() {
        return Ok(0);
    }
    let mut buf = vec![0u8; expected.len()];
    read_full(reader, &mut buf).map_err(|e| e.with_expected(expected))?;
    if buf != expected {
        return Err(DeserializationError::HeaderMismatch {
            data: ReadErrorData {
                partial_read: false,
                bytes_read: expected.len(),
                actually_read: buf,
                expected: expected.to_vec(),
            },
        });
    }
    Ok(expected.len())
}

/// Writes all of `data`, retrying on interruption.
///
/// On failure the error carries the byte count already written, whether
/// the write was partial, and a copy of the attempted payload for
/// diagnostics.
pub fn write_full<W: Write + ?Sized>(
    writer: &mut W,
    data: &[u8],
) -> Result<usize, SerializationError> {
    assert!(
        data.len() <= i32::MAX as usize,
        "write length exceeds i32::MAX"
    );
    let mut written = 0;
    while written < data.len() {
        match writer.write(&data[written..]) {
            Ok(0) => {
                return Err(SerializationError::Io {
                    source: io::Error::new(io::ErrorKind::WriteZero, "writer accepted no bytes"),
                    data: WriteErrorData {
                        partial_write: written > 0,
                        bytes_written: written,
                        data: data.to_vec(),
                    },
                });
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(SerializationError::Io {
                    source: e,
                    data: WriteErrorData {
                        partial_write: written > 0,
                        bytes_written: written,
                        data: data.to_vec(),
                    },
                });
            }
        }
    }
    Ok(data.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Yields a fixed prefix, then reports end of stream.
    struct TruncatedReader {
        data: Vec<u8>,
        position: usize,
    }

    impl TruncatedReader {
        fn new(data: &[u8]) -> Self {
            Self {
                data: data.to_vec(),
                position: 0,
            }
        }
    }

    impl Read for TruncatedReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let remaining = &self.data[self.position..];
            let n = remaining.len().min(buf.len()).min(1); // one byte at a time
            buf[..n].copy_from_slice(&remaining[..n]);
            self.position += n;
            Ok(n)
        }
    }

    /// Accepts a fixed number of bytes, then fails.
    struct StubbornWriter {
        capacity: usize,
        written: Vec<u8>,
    }

    impl Write for StubbornWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written.len() >= self.capacity {
                return Err(io::Error::new(io::ErrorKind::Other, "writer is full"));
            }
            let n = buf.len().min(self.capacity - self.written.len()).min(1);
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn eof_before_first_byte() {
        let mut reader = TruncatedReader::new(&[]);
        let mut buf = [0u8; 4];
        let err = read_full(&mut reader, &mut buf).unwrap_err();
        assert!(matches!(err, DeserializationError::Eof { .. }));
        assert_eq!(err.read_data().bytes_read, 0);
        assert!(!err.read_data().partial_read);
    }

    #[test]
    fn eof_mid_stream_is_partial() {
        let mut reader = TruncatedReader::new(&[1u8; 15]);
        let mut buf = [0u8; 32];
        let err = read_full(&mut reader, &mut buf).unwrap_err();
        assert!(matches!(err, DeserializationError::UnexpectedEof { .. }));
        assert_eq!(err.read_data().bytes_read, 15);
        assert!(err.read_data().partial_read);
        assert_eq!(err.read_data().actually_read, vec![1u8; 15]);
    }

    #[test]
    fn fragmented_reads_are_reassembled() {
        let mut reader = TruncatedReader::new(&[7u8; 32]);
        let mut buf = [0u8; 32];
        assert_eq!(read_full(&mut reader, &mut buf).unwrap(), 32);
        assert_eq!(buf, [7u8; 32]);
    }

    #[test]
    fn expected_bytes_match() {
        let mut reader = TruncatedReader::new(b"headerbody");
        assert_eq!(consume_expected_bytes(&mut reader, b"header").unwrap(), 6);
        // The stream is positioned right after the expected bytes.
        let mut rest = [0u8; 4];
        read_full(&mut reader, &mut rest).unwrap();
        assert_eq!(&rest, b"body");
    }

    #[test]
    fn expected_bytes_mismatch_consumes_everything() {
        let mut reader = TruncatedReader::new(b"headless-tail");
        let err = consume_expected_bytes(&mut reader, b"headerxx").unwrap_err();
        assert!(matches!(err, DeserializationError::HeaderMismatch { .. }));
        assert_eq!(err.read_data().expected, b"headerxx");
        assert_eq!(err.read_data().actually_read, b"headless");
        // The full expected length was consumed despite the early mismatch.
        let mut rest = [0u8; 5];
        read_full(&mut reader, &mut rest).unwrap();
        assert_eq!(&rest, b"-tail");
    }

    #[test]
    fn expected_bytes_truncated_stream() {
        let mut reader = TruncatedReader::new(b"head");
        let err = consume_expected_bytes(&mut reader, b"header").unwrap_err();
        assert!(matches!(err, DeserializationError::UnexpectedEof { .. }));
        assert_eq!(err.read_data().bytes_read, 4);
        assert_eq!(err.read_data().expected, b"header");
    }

    #[test]
    fn failing_writer_reports_progress() {
        let mut writer = StubbornWriter {
            capacity: 3,
            written: Vec::new(),
        };
        let err = write_full(&mut writer, &[9u8; 8]).unwrap_err();
        match &err {
            SerializationError::Io { data, .. } => {
                assert_eq!(data.bytes_written, 3);
                assert!(data.partial_write);
                assert_eq!(data.data, vec![9u8; 8]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.bytes_written(), 3);
    }

    #[test]
    fn successful_write_returns_length() {
        let mut sink = Vec::new();
        assert_eq!(write_full(&mut sink, &[1, 2, 3]).unwrap(), 3);
        assert_eq!(sink, vec![1, 2, 3]);
    }
}
