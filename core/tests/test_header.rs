// Header suite: fixed-width layout, accepted version, and every rejection
// path the reader can hit before the first block.

#[cfg(test)]
mod tests {
    use rmscene_core::constants::{HEADER_LEN, HEADER_PREFIX};
    use rmscene_core::headers::{decode_header, encode_header, FileHeader, HeaderError};

    fn header_bytes(text: &str) -> Vec<u8> {
        let mut out = vec![b' '; HEADER_LEN];
        out[..text.len()].copy_from_slice(text.as_bytes());
        out
    }

// # ✅ 1. Encoding

    #[test]
    fn default_header_is_version_6() {
        let h = FileHeader::default();
        assert_eq!(h.version, 6);
        h.validate().unwrap();
        assert_eq!(h.text(), "reMarkable .lines file, version=6");
    }

    #[test]
    fn encoded_header_is_fixed_width_and_space_padded() {
        let out = encode_header(&FileHeader::default()).unwrap();
        assert_eq!(out.len(), HEADER_LEN);
        assert!(out.starts_with(b"reMarkable .lines file, version=6"));
        assert!(out[HEADER_PREFIX.len() + 1..].iter().all(|&b| b == b' '));
    }

    #[test]
    fn encode_refuses_unsupported_version() {
        let err = encode_header(&FileHeader { version: 5 }).unwrap_err();
        assert_eq!(err, HeaderError::UnsupportedVersion { have: 5, need: 6 });
    }

// # ✅ 2. Decoding

    #[test]
    fn decode_accepts_encoded_header() {
        let out = encode_header(&FileHeader::default()).unwrap();
        assert_eq!(decode_header(&out).unwrap(), FileHeader::default());
    }

    #[test]
    fn decode_ignores_bytes_after_header() {
        let mut buf = encode_header(&FileHeader::default()).unwrap().to_vec();
        buf.extend_from_slice(&[0x01, 0x02, 0x00, 0x01]);
        assert_eq!(decode_header(&buf).unwrap().version, 6);
    }

// # ✅ 3. Rejections

    #[test]
    fn short_buffer_is_rejected() {
        let err = decode_header(b"reMarkable .lines").unwrap_err();
        assert_eq!(err, HeaderError::BufferTooShort { have: 17, need: HEADER_LEN });
    }

    #[test]
    fn foreign_format_is_rejected() {
        let buf = header_bytes("reMarkable .pdf file, version=6");
        assert!(matches!(decode_header(&buf), Err(HeaderError::InvalidFormat { .. })));
    }

    #[test]
    fn non_numeric_version_is_rejected() {
        let buf = header_bytes("reMarkable .lines file, version=x");
        assert!(matches!(decode_header(&buf), Err(HeaderError::InvalidVersion { .. })));
    }

    #[test]
    fn older_version_is_rejected() {
        let buf = header_bytes("reMarkable .lines file, version=5");
        assert_eq!(
            decode_header(&buf).unwrap_err(),
            HeaderError::UnsupportedVersion { have: 5, need: 6 }
        );
    }

    #[test]
    fn version_beyond_u8_is_unsupported_not_truncated() {
        let buf = header_bytes("reMarkable .lines file, version=262");
        assert_eq!(
            decode_header(&buf).unwrap_err(),
            HeaderError::UnsupportedVersion { have: 262, need: 6 }
        );
    }

    #[test]
    fn non_space_padding_is_rejected() {
        let mut buf = header_bytes("reMarkable .lines file, version=6");
        buf[HEADER_LEN - 1] = 0;
        assert!(matches!(decode_header(&buf), Err(HeaderError::InvalidPadding { .. })));
    }

    #[test]
    fn error_messages_name_the_problem() {
        let err = decode_header(&[0u8; 4]).unwrap_err();
        assert_eq!(err.to_string(), "header buffer too short: 4 < 43");
    }
}
