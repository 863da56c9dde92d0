/// Timing profile understood by fixed-code 433MHz receivers.
///
/// All pulse fields are counts of pulse units, not microseconds. The
/// actual unit length comes from the device configuration; `pulse_length_us`
/// is only the reference value the profile was measured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Protocol {
    pub pulse_length_us: u32,
    pub sync_high: u8,
    pub sync_low: u8,
    pub zero_high: u8,
    pub zero_low: u8,
    pub one_high: u8,
    pub one_low: u8,
}

impl Protocol {
    const fn new(pulse_length_us: u32, sync: (u8, u8), zero: (u8, u8), one: (u8, u8)) -> Self {
        Self {
            pulse_length_us,
            sync_high: sync.0,
            sync_low: sync.1,
            zero_high: zero.0,
            zero_low: zero.1,
            one_high: one.0,
            one_low: one.1,
        }
    }

    pub fn table() -> &'static [Self; PROTOCOL_COUNT] {
        &PROTOCOLS
    }

    /// Look up a protocol by its 0-based table index.
    pub fn by_index(index: usize) -> Option<&'static Self> {
        PROTOCOLS.get(index)
    }

    /// Look up a protocol by the 1-based number used in receiver docs and configs.
    pub fn by_number(number: usize) -> Option<&'static Self> {
        number.checked_sub(1).and_then(Self::by_index)
    }

    /// High/low pulse counts for the given symbol.
    pub fn pulses(&self, waveform: Waveform) -> (u8, u8) {
        match waveform {
            Waveform::Zero => (self.zero_high, self.zero_low),
            Waveform::One => (self.one_high, self.one_low),
            Waveform::Sync => (self.sync_high, self.sync_low),
        }
    }
}

pub const PROTOCOL_COUNT: usize = 6;

static PROTOCOLS: [Protocol; PROTOCOL_COUNT] = [
    Protocol::new(350, (1, 31), (1, 3), (3, 1)),
    Protocol::new(650, (1, 10), (1, 2), (2, 1)),
    Protocol::new(100, (30, 71), (4, 11), (9, 6)),
    Protocol::new(380, (1, 6), (1, 3), (3, 1)),
    Protocol::new(500, (6, 14), (1, 2), (2, 1)),
    Protocol::new(200, (1, 10), (1, 5), (1, 1)),
];

/// The three symbols a frame is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Zero,
    One,
    Sync,
}

impl Waveform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Waveform::Zero => "zero",
            Waveform::One => "one",
            Waveform::Sync => "sync",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering_is_one_based() {
        assert_eq!(Protocol::by_number(1), Protocol::by_index(0));
        assert_eq!(Protocol::by_number(6), Protocol::by_index(5));
        assert!(Protocol::by_number(0).is_none());
        assert!(Protocol::by_number(7).is_none());
    }

    #[test]
    fn test_protocol_one_pulses() {
        let p = Protocol::by_number(1).unwrap();
        assert_eq!(p.pulse_length_us, 350);
        assert_eq!(p.pulses(Waveform::Zero), (1, 3));
        assert_eq!(p.pulses(Waveform::One), (3, 1));
        assert_eq!(p.pulses(Waveform::Sync), (1, 31));
    }

    #[test]
    fn test_full_table() {
        let expected = [
            (350, 1, 31, 1, 3, 3, 1),
            (650, 1, 10, 1, 2, 2, 1),
            (100, 30, 71, 4, 11, 9, 6),
            (380, 1, 6, 1, 3, 3, 1),
            (500, 6, 14, 1, 2, 2, 1),
            (200, 1, 10, 1, 5, 1, 1),
        ];
        for (i, e) in expected.iter().enumerate() {
            let p = Protocol::by_index(i).unwrap();
            assert_eq!(
                (p.pulse_length_us, p.sync_high, p.sync_low, p.zero_high, p.zero_low, p.one_high, p.one_low),
                *e,
                "protocol {}",
                i + 1
            );
        }
    }

    #[test]
    fn test_waveform_as_str() {
        assert_eq!(Waveform::Zero.as_str(), "zero");
        assert_eq!(Waveform::One.as_str(), "one");
        assert_eq!(Waveform::Sync.as_str(), "sync");
    }
}
