//! Base64 VLQ codec used by the `mappings` field

const BASE64_CHARS: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const BASE64_VALUES: [i8; 128] = {
    let mut table = [-1i8; 128];
    let mut i = 0;
    while i < BASE64_CHARS.len() {
        table[BASE64_CHARS[i] as usize] = i as i8;
        i += 1;
    }
    table
};

const CONTINUATION_BIT: u64 = 0x20;
const VALUE_MASK: u64 = 0x1F;

/// Append the VLQ encoding of `value` to `out`.
pub fn encode_into(value: i64, out: &mut String) {
    // Sign goes into the least significant bit
    let mut unsigned: u64 = if value < 0 {
        (value.unsigned_abs() << 1) | 1
    } else {
        (value as u64) << 1
    };

    loop {
        let mut digit = unsigned & VALUE_MASK;
        unsigned >>= 5;
        if unsigned > 0 {
            digit |= CONTINUATION_BIT;
        }
        out.push(BASE64_CHARS[digit as usize] as char);
        if unsigned == 0 {
            break;
        }
    }
}

/// Decode one VLQ value from the front of `chars`.
///
/// Returns `None` when the iterator is exhausted before a value starts,
/// and `Some(Err(()))` when a value is malformed or truncated.
pub fn decode(chars: &mut std::str::Chars<'_>) -> Option<Result<i64, ()>> {
    let mut result: u64 = 0;
    let mut shift = 0u32;
    let mut started = false;

    loop {
        let Some(c) = chars.next() else {
            return if started { Some(Err(())) } else { None };
        };
        started = true;

        let digit = match BASE64_VALUES.get(c as usize) {
            Some(&d) if d >= 0 => d as u64,
            _ => return Some(Err(())),
        };
        // Bits that would fall off the top of the accumulator make the value unrepresentable
        let bits = digit & VALUE_MASK;
        if shift > 60 || (bits << shift) >> shift != bits {
            return Some(Err(()));
        }

        result |= bits << shift;
        shift += 5;

        if digit & CONTINUATION_BIT == 0 {
            break;
        }
    }

    let negative = result & 1 == 1;
    let magnitude = (result >> 1) as i64;
    Some(Ok(if negative { -magnitude } else { magnitude }))
}

/// Decode every value in one comma-free segment.
pub fn decode_segment(segment: &str) -> Result<Vec<i64>, ()> {
    let mut chars = segment.chars();
    let mut values = Vec::with_capacity(5);
    while let Some(value) = decode(&mut chars) {
        values.push(value?);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: i64) -> String {
        let mut out = String::new();
        encode_into(value, &mut out);
        out
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(encode(0), "A");
        assert_eq!(encode(1), "C");
        assert_eq!(encode(-1), "D");
        assert_eq!(encode(15), "e");
        assert_eq!(encode(16), "gB");
        assert_eq!(encode(-16), "hB");
    }

    #[test]
    fn test_decode_matches_encode() {
        for value in [0i64, 1, -1, 16, -16, 127, -127, 1000, -1000, 123_456] {
            let encoded = encode(value);
            assert_eq!(decode_segment(&encoded), Ok(vec![value]), "value {}", value);
        }
    }

    #[test]
    fn test_decode_segment_with_four_fields() {
        // AAAA: all zero deltas; AACA: original line +1
        assert_eq!(decode_segment("AAAA"), Ok(vec![0, 0, 0, 0]));
        assert_eq!(decode_segment("AACA"), Ok(vec![0, 0, 1, 0]));
    }

    #[test]
    fn test_truncated_value_is_an_error() {
        // 'g' carries the continuation bit with nothing after it
        assert_eq!(decode_segment("g"), Err(()));
    }

    #[test]
    fn test_value_wider_than_64_bits_is_an_error() {
        // Twelve continuation digits put the last digit at bit 60; only 4 bits fit there
        assert_eq!(decode_segment("ggggggggggggQ"), Err(()));
        assert_eq!(decode_segment("gggggggggggg/"), Err(()));
        assert_eq!(decode_segment("ggggggggggggE"), Ok(vec![1 << 61]));
    }

    #[test]
    fn test_invalid_character_is_an_error() {
        assert_eq!(decode_segment("A!A"), Err(()));
        assert_eq!(decode_segment("é"), Err(()));
    }
}
