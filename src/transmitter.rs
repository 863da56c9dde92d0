use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::encoder::EncodedCode;
use crate::output_line::{LineError, OutputLine};
use crate::precision_sleep::Delay;
use crate::protocol::{Protocol, Waveform};

/// Pause after each sync marker before the next repeat.
pub const INTER_REPEAT_GAP: Duration = Duration::from_micros(1);

#[derive(Debug, thiserror::Error)]
pub enum TransmitError {
    #[error("Output line error: {0}")]
    Line(#[from] LineError),

    #[error("Transmission cancelled")]
    Cancelled,
}

/// Flag another thread can raise to stop a transmission between waveforms.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Drives one encoded frame onto an output line, `repeat` times.
pub struct Transmitter<'a, L: ?Sized, D: ?Sized> {
    line: &'a mut L,
    delay: &'a mut D,
    protocol: &'static Protocol,
    pulse_length_us: u32,
    cancel: Option<&'a CancelToken>,
}

impl<'a, L: OutputLine + ?Sized, D: Delay + ?Sized> Transmitter<'a, L, D> {
    pub fn new(
        line: &'a mut L,
        delay: &'a mut D,
        protocol: &'static Protocol,
        pulse_length_us: u32,
    ) -> Self {
        Self {
            line,
            delay,
            protocol,
            pulse_length_us,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: Option<&'a CancelToken>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Hold time for `pulses` pulse units.
    pub fn hold(&self, pulses: u8) -> Duration {
        Duration::from_micros(u64::from(pulses) * u64::from(self.pulse_length_us))
    }

    /// Send the frame `repeat` times: every bit, then a sync marker, then the gap.
    ///
    /// The first line failure aborts the whole transmission. The line is
    /// left as the last successful write set it.
    pub fn transmit(&mut self, frame: &EncodedCode, repeat: u32) -> Result<(), TransmitError> {
        for i in 0..repeat {
            log::trace!("Sending repeat {}/{}", i + 1, repeat);
            for bit in 0..frame.bit_length {
                let waveform = if frame.is_zero(bit) {
                    Waveform::Zero
                } else {
                    Waveform::One
                };
                self.send_waveform(waveform)?;
            }
            self.send_waveform(Waveform::Sync)?;
            self.delay.delay(INTER_REPEAT_GAP);
        }
        Ok(())
    }

    fn send_waveform(&mut self, waveform: Waveform) -> Result<(), TransmitError> {
        // Line is low between waveforms, so stopping here never leaves the carrier keyed
        if self.cancel.is_some_and(CancelToken::is_cancelled) {
            log::warn!("Transmission cancelled before {} waveform", waveform.as_str());
            return Err(TransmitError::Cancelled);
        }

        let (high, low) = self.protocol.pulses(waveform);
        let (high, low) = (self.hold(high), self.hold(low));
        self.line.set_high()?;
        self.delay.delay(high);
        self.line.set_low()?;
        self.delay.delay(low);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{encode_frame, WidthPolicy};
    use crate::recording::{Event, Recorder};

    fn us(micros: u64) -> Duration {
        Duration::from_micros(micros)
    }

    fn frame(digits: &str) -> EncodedCode {
        EncodedCode {
            digits: digits.to_string(),
            bit_length: digits.len(),
        }
    }

    #[test]
    fn test_protocol_one_waveform_timing() {
        let recorder = Recorder::new();
        let mut line = recorder.line();
        let mut delay = recorder.delay();
        let protocol = Protocol::by_number(1).unwrap();

        Transmitter::new(&mut line, &mut delay, protocol, 100)
            .transmit(&frame("01"), 1)
            .unwrap();

        assert_eq!(
            recorder.waveforms(),
            vec![(us(100), us(300)), (us(300), us(100)), (us(100), us(3_100))]
        );
        assert_eq!(recorder.events().last(), Some(&Event::Hold(INTER_REPEAT_GAP)));
    }

    #[test]
    fn test_repeat_counts() {
        let recorder = Recorder::new();
        let mut line = recorder.line();
        let mut delay = recorder.delay();
        let protocol = Protocol::by_number(2).unwrap();

        Transmitter::new(&mut line, &mut delay, protocol, 650)
            .transmit(&frame("10110"), 4)
            .unwrap();

        let sync = (us(650), us(6_500));
        let waveforms = recorder.waveforms();
        assert_eq!(waveforms.len(), 4 * (5 + 1));
        assert_eq!(waveforms.iter().filter(|w| **w == sync).count(), 4);
        let gaps = recorder
            .events()
            .iter()
            .filter(|e| **e == Event::Hold(INTER_REPEAT_GAP))
            .count();
        assert_eq!(gaps, 4);
    }

    #[test]
    fn test_positions_past_digits_are_one_bits() {
        let recorder = Recorder::new();
        let mut line = recorder.line();
        let mut delay = recorder.delay();
        let protocol = Protocol::by_number(1).unwrap();
        let encoded = encode_frame(16_777_217, 24, WidthPolicy::Legacy);

        Transmitter::new(&mut line, &mut delay, protocol, 10)
            .transmit(&encoded, 1)
            .unwrap();

        let zero = (us(10), us(30));
        let one = (us(30), us(10));
        let waveforms = recorder.waveforms();
        assert_eq!(waveforms.len(), 33);
        assert!(waveforms[..23].iter().all(|w| *w == zero));
        assert!(waveforms[23..32].iter().all(|w| *w == one));
    }

    #[test]
    fn test_line_failure_aborts() {
        let recorder = Recorder::new();
        let mut line = recorder.line().fail_after(3);
        let mut delay = recorder.delay();
        let protocol = Protocol::by_number(1).unwrap();

        let result = Transmitter::new(&mut line, &mut delay, protocol, 350).transmit(&frame("0000"), 10);

        assert!(matches!(result, Err(TransmitError::Line(LineError::Injected { after: 3 }))));
        assert_eq!(recorder.transitions(), 3);
        assert_eq!(recorder.events().last(), Some(&Event::Hold(us(350))));
    }

    #[test]
    fn test_cancelled_before_first_waveform() {
        let recorder = Recorder::new();
        let mut line = recorder.line();
        let mut delay = recorder.delay();
        let protocol = Protocol::by_number(1).unwrap();
        let token = CancelToken::new();
        token.cancel();

        let result = Transmitter::new(&mut line, &mut delay, protocol, 350)
            .with_cancel(Some(&token))
            .transmit(&frame("0101"), 3);

        assert!(matches!(result, Err(TransmitError::Cancelled)));
        assert!(recorder.events().is_empty());

        token.reset();
        assert!(!token.is_cancelled());
    }
}
