//! Reader for UDP capture files.
//!
//! Two layouts are accepted:
//! - `ORACAPv1` captures: 8-byte magic, then per datagram `u64` timestamp ns,
//!   `u16` source length, source string, `u32` original length, `u32` stored
//!   length and the stored bytes (all little-endian);
//! - anything else is treated as a single raw datagram.

use crate::error::CliError;

pub const CAPTURE_MAGIC: &[u8; 8] = b"ORACAPv1";

/// One datagram read from a capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedDatagram {
    pub timestamp_ns: Option<u64>,
    pub source: Option<String>,
    /// Length on the wire; larger than `data.len()` when the capture was cut.
    pub original_len: usize,
    pub data: Vec<u8>,
}

impl CapturedDatagram {
    pub fn is_cut(&self) -> bool {
        self.original_len > self.data.len()
    }
}

pub fn read_datagrams(bytes: &[u8]) -> Result<Vec<CapturedDatagram>, CliError> {
    let Some(mut rest) = bytes.strip_prefix(CAPTURE_MAGIC.as_slice()) else {
        return Ok(vec![CapturedDatagram {
            timestamp_ns: None,
            source: None,
            original_len: bytes.len(),
            data: bytes.to_vec(),
        }]);
    };

    let mut out = Vec::new();
    while !rest.is_empty() {
        let index = out.len();
        let timestamp_ns = u64::from_le_bytes(take_array(&mut rest, index, "timestamp")?);
        let source_len = usize::from(u16::from_le_bytes(take_array(&mut rest, index, "source length")?));
        let source = take(&mut rest, source_len, index, "source")?;
        let original_len = u32::from_le_bytes(take_array(&mut rest, index, "length")?);
        let stored_len = u32::from_le_bytes(take_array(&mut rest, index, "stored length")?);
        let data = take(&mut rest, stored_len as usize, index, "payload")?;
        out.push(CapturedDatagram {
            timestamp_ns: Some(timestamp_ns),
            source: Some(String::from_utf8_lossy(source).into_owned()),
            original_len: original_len as usize,
            data: data.to_vec(),
        });
    }
    Ok(out)
}

fn take<'a>(
    rest: &mut &'a [u8],
    len: usize,
    index: usize,
    what: &str,
) -> Result<&'a [u8], CliError> {
    if rest.len() < len {
        return Err(CliError::CaptureFormat(format!(
            "record {index}: {what} needs {len} bytes, {} left",
            rest.len()
        )));
    }
    let (head, tail) = rest.split_at(len);
    *rest = tail;
    Ok(head)
}

fn take_array<const N: usize>(
    rest: &mut &[u8],
    index: usize,
    what: &str,
) -> Result<[u8; N], CliError> {
    let head = take(rest, N, index, what)?;
    let mut out = [0u8; N];
    out.copy_from_slice(head);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn record(ts: u64, source: &str, payload: &[u8], original_len: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&ts.to_le_bytes());
        buf.extend_from_slice(&(source.len() as u16).to_le_bytes());
        buf.extend_from_slice(source.as_bytes());
        buf.extend_from_slice(&original_len.to_le_bytes());
        buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        buf.extend_from_slice(payload);
        buf
    }

    #[test]
    fn raw_file_is_one_datagram() -> TestResult {
        let datagrams = read_datagrams(&[1, 2, 3])?;
        assert_eq!(datagrams.len(), 1);
        assert_eq!(datagrams[0].data, vec![1, 2, 3]);
        assert_eq!(datagrams[0].source, None);
        Ok(())
    }

    #[test]
    fn capture_records_are_read_in_order() -> TestResult {
        let mut bytes = CAPTURE_MAGIC.to_vec();
        bytes.extend(record(10, "127.0.0.1:5000", &[0xAA; 4], 4));
        bytes.extend(record(20, "127.0.0.1:5000", &[0xBB; 2], 9));

        let datagrams = read_datagrams(&bytes)?;
        assert_eq!(datagrams.len(), 2);
        assert_eq!(datagrams[0].timestamp_ns, Some(10));
        assert_eq!(datagrams[0].source.as_deref(), Some("127.0.0.1:5000"));
        assert!(!datagrams[0].is_cut());
        assert_eq!(datagrams[1].data, vec![0xBB, 0xBB]);
        assert!(datagrams[1].is_cut());
        Ok(())
    }

    #[test]
    fn truncated_capture_names_the_record() {
        let mut bytes = CAPTURE_MAGIC.to_vec();
        bytes.extend(record(10, "a", &[1, 2, 3], 3));
        bytes.extend_from_slice(&[0u8; 5]);
        let err = read_datagrams(&bytes).err().map(|e| e.to_string());
        assert_eq!(
            err.as_deref(),
            Some("Malformed capture file: record 1: timestamp needs 8 bytes, 5 left")
        );
    }
}
