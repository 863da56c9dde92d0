//! # rf433 RS
//!
//! A Rust library for sending fixed codes to 433MHz receivers such as
//! remote-controlled power sockets.
//!
//! An integer code is turned into a fixed-width bit string and keyed onto a
//! digital output line wired to a cheap on/off keyed transmitter. Each bit,
//! and the sync marker closing every frame, is a high pulse followed by a low
//! pulse whose lengths come from one of six well known timing profiles.
//!
//! ## Features
//!
//! - **Protocol table**: the six common fixed-code timing profiles
//! - **Precise timing**: coarse sleep plus spin-wait for microsecond pulses
//! - **Pluggable output**: any [`OutputLine`], with Linux sysfs and GPIO
//!   character device backends included
//! - **Dry runs**: [`recording`] captures every edge and hold time without hardware
//! - **Type safety**: validated configuration and typed errors throughout
//!
//! ## Examples
//!
//! ### Sending a Code
//!
//! ```rust,no_run
//! use rf433_rs::{RfConfig, RfDevice, SysfsLine};
//!
//! let line = SysfsLine::acquire(17)?;
//! let config = RfConfig::builder()
//!     .protocol(1)
//!     .repeat(10)
//!     .pulse_length_us(180)
//!     .bit_length(24)
//!     .build()?;
//!
//! let mut device = RfDevice::new(line, config);
//! device.send(5_121_438)?;
//! device.cleanup()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Dry Run
//!
//! ```rust
//! use rf433_rs::recording::Recorder;
//! use rf433_rs::{RfConfig, RfDevice};
//!
//! let recorder = Recorder::new();
//! let config = RfConfig::builder().repeat(1).build().unwrap();
//! let mut device = RfDevice::with_delay(recorder.line(), recorder.delay(), config);
//!
//! device.send(5_121_438).unwrap();
//! // 24 bit waveforms and one sync marker
//! assert_eq!(recorder.waveforms().len(), 25);
//! ```
//!
//! ### Encoding Only
//!
//! ```rust
//! use rf433_rs::encoder::encode;
//!
//! assert_eq!(encode(5_121_438, 24), "010011100010010110011110");
//! ```

pub mod config;
pub mod encoder;
pub mod output_line;
pub mod precision_sleep;
pub mod protocol;
pub mod recording;
pub mod rf_device;
pub mod transmitter;

// Re-export the main types for convenience
pub use config::{ConfigError, RfConfig, RfConfigBuilder};

pub use encoder::{EncodedCode, WidthPolicy};

pub use output_line::{CdevLine, LineError, LineKind, OutputLine, SysfsLine};

pub use precision_sleep::{Delay, PrecisionSleep};

pub use protocol::{Protocol, Waveform};

pub use rf_device::{RfDevice, RfDeviceError};

pub use transmitter::{CancelToken, TransmitError, Transmitter};
