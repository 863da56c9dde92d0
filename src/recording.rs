//! In-memory line and delay that log what a transmission would do.
//!
//! Useful for dry runs and for asserting pulse timing without hardware or
//! real sleeps. A [`RecordingLine`] and a [`RecordingDelay`] created from the
//! same [`Recorder`] write into one ordered event log.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::output_line::{LineError, LineKind, OutputLine};
use crate::precision_sleep::Delay;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    High,
    Low,
    Hold(Duration),
    Released,
}

/// Shared, cloneable event log.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self) -> RecordingLine {
        RecordingLine {
            recorder: self.clone(),
            transitions: 0,
            fail_after: None,
        }
    }

    pub fn delay(&self) -> RecordingDelay {
        RecordingDelay {
            recorder: self.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Event>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, event: Event) {
        self.lock().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of high/low edges written to the line.
    pub fn transitions(&self) -> usize {
        self.lock()
            .iter()
            .filter(|e| matches!(e, Event::High | Event::Low))
            .count()
    }

    /// Fold the log into `(high, low)` hold times, one pair per waveform.
    ///
    /// Only complete `High, Hold, Low, Hold` runs are reported; the
    /// inter-repeat gap and any trailing partial waveform are skipped.
    pub fn waveforms(&self) -> Vec<(Duration, Duration)> {
        let events = self.lock();
        let mut out = Vec::new();
        let mut i = 0;
        while i < events.len() {
            match &events[i..] {
                [Event::High, Event::Hold(high), Event::Low, Event::Hold(low), ..] => {
                    out.push((*high, *low));
                    i += 4;
                }
                _ => i += 1,
            }
        }
        out
    }
}

/// Output line that records its transitions into a [`Recorder`].
#[derive(Debug)]
pub struct RecordingLine {
    recorder: Recorder,
    transitions: usize,
    fail_after: Option<usize>,
}

impl RecordingLine {
    /// Make every transition after the first `after` fail.
    pub fn fail_after(mut self, after: usize) -> Self {
        self.fail_after = Some(after);
        self
    }

    fn transition(&mut self, event: Event) -> Result<(), LineError> {
        if let Some(after) = self.fail_after {
            if self.transitions >= after {
                return Err(LineError::Injected { after });
            }
        }
        self.transitions += 1;
        self.recorder.push(event);
        Ok(())
    }
}

impl OutputLine for RecordingLine {
    fn set_high(&mut self) -> Result<(), LineError> {
        self.transition(Event::High)
    }

    fn set_low(&mut self) -> Result<(), LineError> {
        self.transition(Event::Low)
    }

    fn release(&mut self) -> Result<(), LineError> {
        self.recorder.push(Event::Released);
        Ok(())
    }

    fn kind(&self) -> LineKind {
        LineKind::Recording
    }
}

/// Delay that records the requested hold instead of sleeping.
#[derive(Debug, Clone)]
pub struct RecordingDelay {
    recorder: Recorder,
}

impl Delay for RecordingDelay {
    fn delay(&mut self, duration: Duration) {
        self.recorder.push(Event::Hold(duration));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_and_delay_share_one_log() {
        let recorder = Recorder::new();
        let mut line = recorder.line();
        let mut delay = recorder.delay();

        line.set_high().unwrap();
        delay.delay(Duration::from_micros(350));
        line.set_low().unwrap();
        delay.delay(Duration::from_micros(1_050));

        assert_eq!(recorder.transitions(), 2);
        assert_eq!(
            recorder.waveforms(),
            vec![(Duration::from_micros(350), Duration::from_micros(1_050))]
        );
    }

    #[test]
    fn test_fail_after_stops_recording() {
        let recorder = Recorder::new();
        let mut line = recorder.line().fail_after(1);

        assert!(line.set_high().is_ok());
        assert!(matches!(line.set_low(), Err(LineError::Injected { after: 1 })));
        assert_eq!(recorder.events(), vec![Event::High]);
    }

    #[test]
    fn test_waveforms_skip_gaps() {
        let recorder = Recorder::new();
        let mut line = recorder.line();
        let mut delay = recorder.delay();
        let us = Duration::from_micros;

        for _ in 0..2 {
            line.set_high().unwrap();
            delay.delay(us(10));
            line.set_low().unwrap();
            delay.delay(us(30));
            delay.delay(us(1));
        }

        assert_eq!(recorder.waveforms(), vec![(us(10), us(30)), (us(10), us(30))]);
        recorder.clear();
        assert!(recorder.events().is_empty());
    }
}
