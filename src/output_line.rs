use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum LineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to acquire GPIO {pin}: {source}")]
    Acquire {
        pin: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to request line {offset} on {}: {source}", .chip.display())]
    ChipRequest {
        chip: PathBuf,
        offset: u32,
        #[source]
        source: gpiocdev::Error,
    },

    #[error("GPIO character device error: {0}")]
    Cdev(#[from] gpiocdev::Error),

    #[error("Injected line failure after {after} transitions")]
    Injected { after: usize },
}

/// Which backend drives a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Sysfs,
    Cdev,
    Recording,
    Other,
}

impl LineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineKind::Sysfs => "sysfs",
            LineKind::Cdev => "cdev",
            LineKind::Recording => "recording",
            LineKind::Other => "other",
        }
    }
}

/// Digital output wired to the data pin of a 433MHz transmitter.
///
/// Acquiring the line is the backend's job; an [`crate::RfDevice`] only
/// toggles it and hands it back through [`OutputLine::release`] on cleanup.
pub trait OutputLine {
    fn set_high(&mut self) -> Result<(), LineError>;

    fn set_low(&mut self) -> Result<(), LineError>;

    fn release(&mut self) -> Result<(), LineError> {
        Ok(())
    }

    fn kind(&self) -> LineKind {
        LineKind::Other
    }
}

/// GPIO line driven through the Linux sysfs interface.
#[derive(Debug)]
pub struct SysfsLine {
    pin: u32,
    root: PathBuf,
    value: File,
    exported_by_us: bool,
}

impl SysfsLine {
    pub const DEFAULT_ROOT: &'static str = "/sys/class/gpio";

    /// Acquire BCM pin `pin` as an output under `/sys/class/gpio`.
    pub fn acquire(pin: u32) -> Result<Self, LineError> {
        Self::acquire_at(Self::DEFAULT_ROOT, pin)
    }

    /// Acquire `pin` under a custom gpio root.
    ///
    /// A pin exported here is unexported again if the rest of the setup fails.
    pub fn acquire_at(root: impl AsRef<Path>, pin: u32) -> Result<Self, LineError> {
        let root = root.as_ref().to_path_buf();
        let pin_dir = root.join(format!("gpio{}", pin));

        let exported_by_us = if pin_dir.exists() {
            log::debug!("GPIO {} already exported", pin);
            false
        } else {
            log::debug!("Exporting GPIO {} under {}", pin, root.display());
            fs::write(root.join("export"), pin.to_string())
                .map_err(|source| LineError::Acquire { pin, source })?;
            true
        };

        match Self::open_output(&pin_dir) {
            Ok(value) => Ok(Self {
                pin,
                root,
                value,
                exported_by_us,
            }),
            Err(source) => {
                if exported_by_us {
                    log::debug!("Setup of GPIO {} failed, unexporting", pin);
                    if let Err(e) = fs::write(root.join("unexport"), pin.to_string()) {
                        log::warn!("Failed to unexport GPIO {}: {}", pin, e);
                    }
                }
                Err(LineError::Acquire { pin, source })
            }
        }
    }

    fn open_output(pin_dir: &Path) -> std::io::Result<File> {
        fs::write(pin_dir.join("direction"), "out")?;
        OpenOptions::new().write(true).open(pin_dir.join("value"))
    }

    pub fn pin(&self) -> u32 {
        self.pin
    }

    fn write_level(&mut self, level: &[u8]) -> Result<(), LineError> {
        self.value.seek(SeekFrom::Start(0))?;
        self.value.write_all(level)?;
        Ok(())
    }
}

impl OutputLine for SysfsLine {
    fn set_high(&mut self) -> Result<(), LineError> {
        self.write_level(b"1")
    }

    fn set_low(&mut self) -> Result<(), LineError> {
        self.write_level(b"0")
    }

    fn release(&mut self) -> Result<(), LineError> {
        self.set_low()?;
        if self.exported_by_us {
            log::debug!("Unexporting GPIO {}", self.pin);
            fs::write(self.root.join("unexport"), self.pin.to_string())?;
            self.exported_by_us = false;
        }
        Ok(())
    }

    fn kind(&self) -> LineKind {
        LineKind::Sysfs
    }
}

/// GPIO line requested through the Linux GPIO character device.
///
/// The line is driven low on [`OutputLine::release`] and handed back to the
/// kernel when the value is dropped.
pub struct CdevLine {
    chip: PathBuf,
    offset: u32,
    request: gpiocdev::Request,
}

impl CdevLine {
    pub const DEFAULT_CHIP: &'static str = "/dev/gpiochip0";
    pub const CONSUMER: &'static str = "rf433-rs";

    /// Request line `offset` of `/dev/gpiochip0` as an output, initially low.
    pub fn acquire(offset: u32) -> Result<Self, LineError> {
        Self::acquire_on(Self::DEFAULT_CHIP, offset)
    }

    /// Request line `offset` of `chip` as an output, initially low.
    pub fn acquire_on(chip: impl AsRef<Path>, offset: u32) -> Result<Self, LineError> {
        let chip = chip.as_ref().to_path_buf();
        log::debug!("Requesting line {} on {}", offset, chip.display());

        let request = gpiocdev::Request::builder()
            .on_chip(chip.clone())
            .with_consumer(Self::CONSUMER)
            .with_line(offset)
            .as_output(gpiocdev::line::Value::Inactive)
            .request()
            .map_err(|source| LineError::ChipRequest {
                chip: chip.clone(),
                offset,
                source,
            })?;

        Ok(Self {
            chip,
            offset,
            request,
        })
    }

    pub fn chip(&self) -> &Path {
        &self.chip
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }
}

impl std::fmt::Debug for CdevLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdevLine")
            .field("chip", &self.chip)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl OutputLine for CdevLine {
    fn set_high(&mut self) -> Result<(), LineError> {
        self.request
            .set_value(self.offset, gpiocdev::line::Value::Active)?;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), LineError> {
        self.request
            .set_value(self.offset, gpiocdev::line::Value::Inactive)?;
        Ok(())
    }

    fn release(&mut self) -> Result<(), LineError> {
        log::debug!("Driving line {} on {} low", self.offset, self.chip.display());
        self.set_low()
    }

    fn kind(&self) -> LineKind {
        LineKind::Cdev
    }
}
