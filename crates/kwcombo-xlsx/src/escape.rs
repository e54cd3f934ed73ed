//! Text escaping for SpreadsheetML
//!
//! Excel stores characters that XML cannot carry as `_xHHHH_` sequences,
//! e.g. `_x000D_` for a carriage return. A literal `_x0041_` in the text is
//! itself protected by escaping its underscore as `_x005F_`.

/// Decode Excel's `_xHHHH_` escape sequences
pub fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find('_') {
        result.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match escape_at(tail) {
            Some(decoded) => {
                result.push(decoded);
                rest = &tail[7..];
            }
            None => {
                result.push('_');
                rest = &tail[1..];
            }
        }
    }
    result.push_str(rest);

    result
}

/// Encode text so it survives an XML round trip through Excel
///
/// Control characters other than tab and line feed become `_xHHHH_`, and
/// underscores that would otherwise read back as an escape are protected.
pub fn encode_excel_escapes(s: &str) -> String {
    let needs_work = s
        .char_indices()
        .any(|(i, c)| needs_escape(c) || (c == '_' && escape_at(&s[i..]).is_some()));
    if !needs_work {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len() + 8);
    for (i, c) in s.char_indices() {
        if needs_escape(c) || (c == '_' && escape_at(&s[i..]).is_some()) {
            result.push_str(&format!("_x{:04X}_", c as u32));
        } else {
            result.push(c);
        }
    }
    result
}

/// Escape the five XML special characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn needs_escape(c: char) -> bool {
    (c < ' ' && c != '\t' && c != '\n') || c == '\u{FFFE}' || c == '\u{FFFF}'
}

/// The character encoded by a `_xHHHH_` sequence at the start of `s`
fn escape_at(s: &str) -> Option<char> {
    let bytes = s.as_bytes();
    if bytes.len() < 7 || bytes[0] != b'_' || bytes[1] != b'x' || bytes[6] != b'_' {
        return None;
    }
    let hex = &s[2..6];
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_excel_escapes_crlf() {
        assert_eq!(decode_excel_escapes("a_x000d_b"), "a\rb");
        assert_eq!(decode_excel_escapes("a_x000a_b"), "a\nb");
    }

    #[test]
    fn test_decode_excel_escapes_multiple() {
        assert_eq!(
            decode_excel_escapes("line1_x000d__x000a_line2"),
            "line1\r\nline2"
        );
    }

    #[test]
    fn test_decode_excel_escapes_underscore() {
        // _x005f_ is an escaped underscore
        assert_eq!(decode_excel_escapes("under_x005f_score"), "under_score");
    }

    #[test]
    fn test_decode_excel_escapes_partial_sequence() {
        assert_eq!(decode_excel_escapes("_x00"), "_x00");
        assert_eq!(decode_excel_escapes("_x000"), "_x000");
        assert_eq!(decode_excel_escapes("_x000d"), "_x000d");
        assert_eq!(decode_excel_escapes("_xZZZZ_"), "_xZZZZ_");
    }

    #[test]
    fn test_decode_excel_escapes_uppercase() {
        assert_eq!(decode_excel_escapes("_x000D_"), "\r");
        assert_eq!(decode_excel_escapes("_x000A_"), "\n");
    }

    #[test]
    fn test_decode_keeps_multibyte_text() {
        assert_eq!(decode_excel_escapes("신발_x0009_운동화"), "신발\t운동화");
        assert_eq!(decode_excel_escapes("snake_case"), "snake_case");
    }

    #[test]
    fn test_encode_control_characters() {
        assert_eq!(encode_excel_escapes("a\rb"), "a_x000D_b");
        assert_eq!(encode_excel_escapes("a\u{1}b"), "a_x0001_b");
        assert_eq!(encode_excel_escapes("tab\tand\nnewline"), "tab\tand\nnewline");
    }

    #[test]
    fn test_encode_protects_literal_sequences() {
        let encoded = encode_excel_escapes("_x0041_");
        assert_eq!(encoded, "_x005F_x0041_");
        assert_eq!(decode_excel_escapes(&encoded), "_x0041_");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b & 'c'"), "a&lt;b &amp; &apos;c&apos;");
    }
}
