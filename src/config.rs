use crate::encoder::WidthPolicy;
use crate::protocol::{Protocol, PROTOCOL_COUNT};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown protocol {index} (valid protocols are 1 to {max})", max = PROTOCOL_COUNT)]
    UnknownProtocol { index: usize },

    #[error("Bit length must be at least 1")]
    ZeroBitLength,

    #[error("Bit length {bit_length} too large (max {max})", max = RfConfig::MAX_BIT_LENGTH)]
    BitLengthTooLarge { bit_length: usize },
}

/// Validated transmitter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RfConfig {
    pub(crate) protocol_number: usize,
    pub(crate) protocol: &'static Protocol,
    pub(crate) repeat: u32,
    pub(crate) pulse_length_us: u32,
    pub(crate) bit_length: usize,
    pub(crate) width_policy: WidthPolicy,
}

impl RfConfig {
    pub const DEFAULT_PROTOCOL: usize = 1;
    pub const DEFAULT_REPEAT: u32 = 10;
    pub const DEFAULT_BIT_LENGTH: usize = 24;
    pub const MAX_BIT_LENGTH: usize = 64;

    pub fn builder() -> RfConfigBuilder {
        RfConfigBuilder::new()
    }

    /// Protocol by 1-based number, repeat count, pulse length in µs and bit length.
    pub fn new(
        protocol: usize,
        repeat: u32,
        pulse_length_us: u32,
        bit_length: usize,
    ) -> Result<Self, ConfigError> {
        Self::builder()
            .protocol(protocol)
            .repeat(repeat)
            .pulse_length_us(pulse_length_us)
            .bit_length(bit_length)
            .build()
    }

    pub fn protocol(&self) -> &'static Protocol {
        self.protocol
    }

    /// 1-based protocol number.
    pub fn protocol_number(&self) -> usize {
        self.protocol_number
    }

    pub fn repeat(&self) -> u32 {
        self.repeat
    }

    pub fn pulse_length_us(&self) -> u32 {
        self.pulse_length_us
    }

    pub fn bit_length(&self) -> usize {
        self.bit_length
    }

    pub fn width_policy(&self) -> WidthPolicy {
        self.width_policy
    }
}

impl Default for RfConfig {
    fn default() -> Self {
        let protocol = &Protocol::table()[Self::DEFAULT_PROTOCOL - 1];
        Self {
            protocol_number: Self::DEFAULT_PROTOCOL,
            protocol,
            repeat: Self::DEFAULT_REPEAT,
            pulse_length_us: protocol.pulse_length_us,
            bit_length: Self::DEFAULT_BIT_LENGTH,
            width_policy: WidthPolicy::Legacy,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RfConfigBuilder {
    protocol: usize,
    repeat: u32,
    pulse_length_us: Option<u32>,
    bit_length: usize,
    width_policy: WidthPolicy,
}

impl RfConfigBuilder {
    pub fn new() -> Self {
        Self {
            protocol: RfConfig::DEFAULT_PROTOCOL,
            repeat: RfConfig::DEFAULT_REPEAT,
            pulse_length_us: None,
            bit_length: RfConfig::DEFAULT_BIT_LENGTH,
            width_policy: WidthPolicy::default(),
        }
    }

    /// 1-based protocol number, as printed on receiver datasheets.
    pub fn protocol(mut self, protocol: usize) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn repeat(mut self, repeat: u32) -> Self {
        self.repeat = repeat;
        self
    }

    /// Pulse unit in µs. Defaults to the selected protocol's reference length.
    pub fn pulse_length_us(mut self, pulse_length_us: u32) -> Self {
        self.pulse_length_us = Some(pulse_length_us);
        self
    }

    pub fn bit_length(mut self, bit_length: usize) -> Self {
        self.bit_length = bit_length;
        self
    }

    pub fn width_policy(mut self, width_policy: WidthPolicy) -> Self {
        self.width_policy = width_policy;
        self
    }

    pub fn build(self) -> Result<RfConfig, ConfigError> {
        let protocol = Protocol::by_number(self.protocol).ok_or(ConfigError::UnknownProtocol {
            index: self.protocol,
        })?;

        if self.bit_length == 0 {
            return Err(ConfigError::ZeroBitLength);
        }
        if self.bit_length > RfConfig::MAX_BIT_LENGTH {
            return Err(ConfigError::BitLengthTooLarge {
                bit_length: self.bit_length,
            });
        }

        Ok(RfConfig {
            protocol_number: self.protocol,
            protocol,
            repeat: self.repeat,
            pulse_length_us: self.pulse_length_us.unwrap_or(protocol.pulse_length_us),
            bit_length: self.bit_length,
            width_policy: self.width_policy,
        })
    }
}

impl Default for RfConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
