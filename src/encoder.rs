/// Codes above this value switch the device to 32-bit frames.
pub const WIDENING_THRESHOLD: u64 = 16_777_216;

/// Frame width used once a code crosses [`WIDENING_THRESHOLD`].
pub const WIDE_BIT_LENGTH: usize = 32;

/// How codes wider than 24 bits are framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidthPolicy {
    /// Encode with the current bit length, then widen to 32.
    ///
    /// Matches deployed transmitters bit for bit: the digit string keeps its
    /// old length and the extra frame positions go out as one-bits.
    #[default]
    Legacy,
    /// Widen to at least 32 first, so every frame position carries a real digit.
    Strict,
}

/// Digit string for one frame together with the bit length to transmit it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCode {
    pub digits: String,
    pub bit_length: usize,
}

impl EncodedCode {
    /// Whether frame position `bit` is sent as a zero-bit.
    ///
    /// Positions past the end of the digit string count as one-bits.
    pub fn is_zero(&self, bit: usize) -> bool {
        self.digits.as_bytes().get(bit) == Some(&b'0')
    }
}

/// Render `code` as `bit_length` binary digits.
///
/// The code is zero-padded to `bit_length + 2` digits and the first two are
/// dropped. Codes that fit are plain padded binary. Wider codes lose their
/// two most significant bits, and anything over `bit_length + 2` bits comes
/// out longer than `bit_length`.
pub fn encode(code: u64, bit_length: usize) -> String {
    let mut padded = format!("{:0width$b}", code, width = bit_length + 2);
    padded.split_off(2)
}

/// Encode `code` and work out the frame width under `policy`.
pub fn encode_frame(code: u64, bit_length: usize, policy: WidthPolicy) -> EncodedCode {
    let widen = code > WIDENING_THRESHOLD;
    match policy {
        WidthPolicy::Legacy => EncodedCode {
            digits: encode(code, bit_length),
            bit_length: if widen { WIDE_BIT_LENGTH } else { bit_length },
        },
        WidthPolicy::Strict => {
            let bit_length = if widen {
                bit_length.max(WIDE_BIT_LENGTH)
            } else {
                bit_length
            };
            EncodedCode {
                digits: encode(code, bit_length),
                bit_length,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_known_code() {
        assert_eq!(encode(5_121_438, 24), "010011100010010110011110");
    }

    #[test]
    fn test_encode_pads_small_codes() {
        assert_eq!(encode(0, 4), "0000");
        assert_eq!(encode(1, 4), "0001");
        assert_eq!(encode(0b1010, 4), "1010");
    }

    #[test]
    fn test_encode_drops_two_top_bits_of_wide_codes() {
        // 9 bits into a 4-bit frame: padded width 6 is exceeded, top two bits go
        assert_eq!(encode(0b1_1010_0110, 4), "0100110");
        // one or two bits over the width also lose their top bits
        assert_eq!(encode(0b1_0101, 4), "0101");
        assert_eq!(encode(0b11_0101, 4), "0101");
    }

    #[test]
    fn test_legacy_widening_keeps_short_digits() {
        let frame = encode_frame(16_777_217, 24, WidthPolicy::Legacy);
        assert_eq!(frame.bit_length, 32);
        assert_eq!(frame.digits, "000000000000000000000001");
        assert!((24..32).all(|b| !frame.is_zero(b)));
    }

    #[test]
    fn test_threshold_itself_does_not_widen() {
        let frame = encode_frame(WIDENING_THRESHOLD, 24, WidthPolicy::Legacy);
        assert_eq!(frame.bit_length, 24);
        assert_eq!(frame.digits, "000000000000000000000000");
    }

    #[test]
    fn test_strict_widening_encodes_full_width() {
        let frame = encode_frame(16_777_217, 24, WidthPolicy::Strict);
        assert_eq!(frame.bit_length, 32);
        assert_eq!(frame.digits, "00000001000000000000000000000001");
    }

    proptest! {
        #[test]
        fn prop_fitting_codes_round_trip(bit_length in 1usize..=63, raw in any::<u64>()) {
            let code = raw & ((1u64 << bit_length) - 1);
            let digits = encode(code, bit_length);
            prop_assert_eq!(digits.len(), bit_length);
            prop_assert_eq!(u64::from_str_radix(&digits, 2).unwrap(), code);
        }
    }
}
