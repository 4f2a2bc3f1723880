//! Percent-encoding for list names used as file-name components.

/// Percent-encode `raw` so it is safe as a single path component.
///
/// Everything outside `[A-Za-z0-9_-]` is escaped as uppercase `%XX`,
/// including `/`, `.` and `%` itself, so an encoded name can never traverse
/// out of the output directory or collide with the file suffixes.
pub fn encode_list_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for &byte in raw.as_bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-') {
            out.push(byte as char);
        } else {
            percent_encode_byte(byte, &mut out);
        }
    }
    out
}

/// Percent-encode a single byte as `%XX`.
fn percent_encode_byte(byte: u8, out: &mut String) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    out.push('%');
    out.push(HEX[(byte >> 4) as usize] as char);
    out.push(HEX[(byte & 0x0F) as usize] as char);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(encode_list_name("metrics"), "metrics");
        assert_eq!(encode_list_name("_tag__web"), "_tag__web");
        assert_eq!(encode_list_name("node-exporter"), "node-exporter");
    }

    #[test]
    fn slashes_are_escaped() {
        assert_eq!(encode_list_name("a/b"), "a%2Fb");
        assert!(!encode_list_name("../../etc/passwd").contains('/'));
    }

    #[test]
    fn dots_are_escaped() {
        assert_eq!(encode_list_name(".."), "%2E%2E");
        assert_eq!(encode_list_name("node.exporter"), "node%2Eexporter");
    }

    #[test]
    fn percent_and_whitespace_are_escaped() {
        assert_eq!(encode_list_name("50%"), "50%25");
        assert_eq!(encode_list_name("a b"), "a%20b");
    }

    #[test]
    fn non_ascii_is_escaped_per_byte() {
        assert_eq!(encode_list_name("ž"), "%C5%BE");
    }
}
