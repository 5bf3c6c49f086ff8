// https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.4.7
//
// Modified UTF-8 differs from standard UTF-8 in two ways: the null character is encoded with two
// bytes (0xC0 0x80), and supplementary characters are encoded as surrogate pairs, each surrogate
// taking three bytes.

/// Decodes modified UTF-8, returning `None` for byte sequences that are not well formed.
///
/// Unpaired surrogates have no `char` representation and are replaced with U+FFFD.
pub(crate) fn decode(bytes: &[u8]) -> Option<String> {
    let mut s = String::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let x = bytes[i];
        if x & 0x80 == 0 {
            s.push(x as char);
            i += 1;
        } else if x & 0xE0 == 0xC0 {
            let y = continuation(bytes, i + 1)?;
            s.push(char::from_u32(((x as u32 & 0x1F) << 6) | y)?);
            i += 2;
        } else if x & 0xF0 == 0xE0 {
            let unit = three_byte_unit(bytes, i)?;
            i += 3;

            if (0xD800..=0xDBFF).contains(&unit) {
                match three_byte_unit(bytes, i) {
                    Some(low) if (0xDC00..=0xDFFF).contains(&low) => {
                        let c = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                        s.push(char::from_u32(c)?);
                        i += 3;
                    }
                    _ => s.push(char::REPLACEMENT_CHARACTER),
                }
            } else {
                s.push(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
        } else {
            return None;
        }
    }

    Some(s)
}

fn continuation(bytes: &[u8], i: usize) -> Option<u32> {
    match bytes.get(i) {
        Some(b) if b & 0xC0 == 0x80 => Some(*b as u32 & 0x3F),
        _ => None,
    }
}

fn three_byte_unit(bytes: &[u8], i: usize) -> Option<u32> {
    let x = *bytes.get(i)?;
    if x & 0xF0 != 0xE0 {
        return None;
    }
    let y = continuation(bytes, i + 1)?;
    let z = continuation(bytes, i + 2)?;

    Some(((x as u32 & 0x0F) << 12) | (y << 6) | z)
}

#[cfg(test)]
mod tests {
    use super::decode;

    #[test]
    fn test_ascii() {
        assert_eq!(Some("java/lang/Object".to_owned()), decode(b"java/lang/Object"));
    }

    #[test]
    fn test_empty() {
        assert_eq!(Some(String::new()), decode(&[]));
    }

    #[test]
    fn test_two_byte_null() {
        assert_eq!(Some("a\0b".to_owned()), decode(&[b'a', 0xC0, 0x80, b'b']));
    }

    #[test]
    fn test_two_and_three_byte_characters() {
        // U+00E9 and U+20AC
        assert_eq!(
            Some("\u{e9}\u{20ac}".to_owned()),
            decode(&[0xC3, 0xA9, 0xE2, 0x82, 0xAC])
        );
    }

    #[test]
    fn test_surrogate_pair() {
        // U+1F600 as the surrogate pair D83D DE00
        assert_eq!(
            Some("\u{1f600}".to_owned()),
            decode(&[0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80])
        );
    }

    #[test]
    fn test_unpaired_surrogate() {
        assert_eq!(
            Some("\u{fffd}x".to_owned()),
            decode(&[0xED, 0xA0, 0xBD, b'x'])
        );
    }

    #[test]
    fn test_truncated_sequence() {
        assert_eq!(None, decode(&[b'a', 0xE2, 0x82]));
    }

    #[test]
    fn test_invalid_lead_byte() {
        assert_eq!(None, decode(&[0xF0, 0x9F, 0x98, 0x80]));
    }
}
