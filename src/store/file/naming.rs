//! Mapping between store keys and lock file names.

/// Extension of every claim file.
pub(super) const LOCK_EXTENSION: &str = "lock";

/// Extension of the per-key guard file that serializes claim and release.
pub(super) const GUARD_EXTENSION: &str = "guard";

/// Encode a store key into a file stem.
///
/// ASCII alphanumerics and `.`, `_`, `-` are kept; every other byte becomes
/// `%XX`. The mapping is injective, so distinct keys never share a file.
pub(super) fn encode_key(key: &str) -> String {
    let mut result = String::with_capacity(key.len());

    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-') {
            result.push(byte as char);
        } else {
            result.push_str(&format!("%{:02X}", byte));
        }
    }

    result
}

/// Decode a file stem produced by [`encode_key`].
///
/// Returns `None` for stems that no encoded key could produce.
pub(super) fn decode_key(stem: &str) -> Option<String> {
    let bytes = stem.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = stem.get(i + 1..i + 3)?;
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(decoded).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_keys_are_unchanged() {
        assert_eq!(encode_key("LOCK_nightly-build.v2"), "LOCK_nightly-build.v2");
    }

    #[test]
    fn test_separators_are_escaped() {
        assert_eq!(encode_key("LOCK_jobs/42"), "LOCK_jobs%2F42");
        assert_eq!(encode_key("LOCK_a b:c"), "LOCK_a%20b%3Ac");
        assert_eq!(encode_key("100%"), "100%25");
    }

    #[test]
    fn test_decode_reverses_encode() {
        for key in ["LOCK_jobs/42", "LOCK_émigré", "LOCK_a b:c", "LOCK_%2F"] {
            assert_eq!(decode_key(&encode_key(key)).as_deref(), Some(key));
        }
    }

    #[test]
    fn test_decode_rejects_truncated_escape() {
        assert!(decode_key("LOCK_%2").is_none());
        assert!(decode_key("LOCK_%zz").is_none());
    }
}
