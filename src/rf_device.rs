use crate::config::{ConfigError, RfConfig};
use crate::encoder::{encode_frame, WidthPolicy, WIDENING_THRESHOLD};
use crate::output_line::{LineError, OutputLine};
use crate::precision_sleep::{Delay, PrecisionSleep};
use crate::protocol::Protocol;
use crate::transmitter::{CancelToken, TransmitError, Transmitter};

#[derive(Debug, thiserror::Error)]
pub enum RfDeviceError {
    #[error("Cannot send code: device is not initialized. Make sure to initialize the device first")]
    NotInitialized,

    #[error("Cannot clean up a device that is not initialized")]
    CleanupWithoutInitialized,

    #[error("Failed to clean up: could not release the output line: {0}")]
    Cleanup(#[source] LineError),

    #[error("Transmission failed: {0}")]
    Transmit(#[from] TransmitError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// A 433MHz transmitter bound to one output line.
///
/// The device starts enabled and owns its line until [`RfDevice::cleanup`]
/// hands it back. After that every operation fails.
pub struct RfDevice<L, D = PrecisionSleep> {
    line: Option<L>,
    delay: D,
    config: RfConfig,
    cancel: Option<CancelToken>,
}

impl<L: OutputLine> RfDevice<L> {
    pub fn new(line: L, config: RfConfig) -> Self {
        Self::with_delay(line, PrecisionSleep::new(), config)
    }

    /// Build a device from raw settings: 1-based protocol number, repeat
    /// count, pulse length in µs and bit length.
    ///
    /// Fails with [`RfDeviceError::Config`] when the settings are invalid.
    pub fn with_params(
        line: L,
        protocol: usize,
        repeat: u32,
        pulse_length_us: u32,
        bit_length: usize,
    ) -> Result<Self, RfDeviceError> {
        let config = RfConfig::new(protocol, repeat, pulse_length_us, bit_length)?;
        Ok(Self::new(line, config))
    }
}

impl<L: OutputLine, D: Delay> RfDevice<L, D> {
    /// Build a device that holds pulses with a custom [`Delay`].
    pub fn with_delay(line: L, delay: D, config: RfConfig) -> Self {
        log::debug!(
            "Created RF device on {} line: protocol {}, repeat {}, pulse length {}µs, bit length {}",
            line.kind().as_str(),
            config.protocol_number(),
            config.repeat(),
            config.pulse_length_us(),
            config.bit_length()
        );
        Self {
            line: Some(line),
            delay,
            config,
            cancel: None,
        }
    }

    /// Stop transmissions early when `token` is cancelled.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Encode `code` and transmit it `repeat` times.
    #[tracing::instrument(
        level = "debug",
        skip(self),
        fields(protocol = self.config.protocol_number(), bit_length = self.config.bit_length())
    )]
    pub fn send(&mut self, code: u64) -> Result<(), RfDeviceError> {
        let line = self.line.as_mut().ok_or(RfDeviceError::NotInitialized)?;

        let frame = encode_frame(code, self.config.bit_length, self.config.width_policy);
        if frame.bit_length != self.config.bit_length {
            log::debug!(
                "Code {} above {}, bit length {} -> {}",
                code,
                WIDENING_THRESHOLD,
                self.config.bit_length,
                frame.bit_length
            );
            self.config.bit_length = frame.bit_length;
        }

        Transmitter::new(
            line,
            &mut self.delay,
            self.config.protocol,
            self.config.pulse_length_us,
        )
        .with_cancel(self.cancel.as_ref())
        .transmit(&frame, self.config.repeat)?;

        Ok(())
    }

    /// Disable the device and release its output line.
    ///
    /// The device is disabled even when the release fails.
    pub fn cleanup(&mut self) -> Result<(), RfDeviceError> {
        let mut line = self
            .line
            .take()
            .ok_or(RfDeviceError::CleanupWithoutInitialized)?;

        log::debug!("Releasing {} output line", line.kind().as_str());
        line.release().map_err(|e| {
            log::warn!("Output line release failed: {}", e);
            RfDeviceError::Cleanup(e)
        })
    }
}

impl<L, D> RfDevice<L, D> {
    pub fn is_enabled(&self) -> bool {
        self.line.is_some()
    }

    /// The owned line, while the device is enabled.
    pub fn line(&self) -> Option<&L> {
        self.line.as_ref()
    }

    pub fn config(&self) -> &RfConfig {
        &self.config
    }

    pub fn protocol(&self) -> &'static Protocol {
        self.config.protocol()
    }

    pub fn repeat(&self) -> u32 {
        self.config.repeat()
    }

    pub fn pulse_length_us(&self) -> u32 {
        self.config.pulse_length_us()
    }

    /// Current frame width. Grows to 32 after sending a code above 16,777,216.
    pub fn bit_length(&self) -> usize {
        self.config.bit_length()
    }

    pub fn width_policy(&self) -> WidthPolicy {
        self.config.width_policy()
    }
}
