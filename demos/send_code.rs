// Send a code to a 433MHz receiver
//
// This example wires a GPIO line to an RF device and sends one code. The line
// comes from sysfs by default, or from a GPIO character device with --chip.
// With --dry-run nothing touches the hardware; the recorded pulse train is printed instead.

use clap::Parser;
use rf433_rs::recording::Recorder;
use rf433_rs::{CdevLine, OutputLine, RfConfig, RfDevice, SysfsLine, WidthPolicy};

#[derive(Parser)]
#[command(name = "send_code")]
#[command(version = "1.0")]
#[command(about = "Send a fixed code through a 433MHz transmitter")]
#[command(long_about = "Encode a decimal code and key it onto the GPIO pin wired to a 433MHz on/off keyed transmitter, using one of the common fixed-code timing profiles.")]
struct Args {
    /// Decimal code to send
    code: u64,

    /// GPIO pin (BCM numbering) wired to the transmitter data input
    #[arg(short = 'g', long, default_value_t = 17)]
    gpio: u32,

    /// Timing profile, 1 to 6
    #[arg(short, long, default_value_t = 1)]
    protocol: usize,

    /// Pulse length in microseconds (defaults to the protocol's reference length)
    #[arg(short = 'l', long)]
    pulse_length: Option<u32>,

    /// Number of times the frame is sent
    #[arg(short, long, default_value_t = 10)]
    repeat: u32,

    /// Bits per frame
    #[arg(short, long, default_value_t = 24)]
    bit_length: usize,

    /// Encode codes above 24 bits with all 32 digits instead of the legacy framing
    #[arg(long)]
    strict_width: bool,

    /// Root of the sysfs GPIO tree
    #[arg(long, default_value = SysfsLine::DEFAULT_ROOT)]
    gpio_root: String,

    /// Drive the pin as a line of this GPIO character device (e.g. /dev/gpiochip0) instead of sysfs
    #[arg(long)]
    chip: Option<String>,

    /// Record the pulse train instead of driving the GPIO
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long, help = "Show debug information and detailed logs")]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    let mut builder = RfConfig::builder()
        .protocol(args.protocol)
        .repeat(args.repeat)
        .bit_length(args.bit_length);
    if let Some(pulse_length) = args.pulse_length {
        builder = builder.pulse_length_us(pulse_length);
    }
    if args.strict_width {
        builder = builder.width_policy(WidthPolicy::Strict);
    }
    let config = builder.build()?;

    println!("433MHz Code Sender");
    println!("==================");
    println!("Code: {}", args.code);
    println!(
        "Protocol: {} ({}µs pulse)",
        config.protocol_number(),
        config.pulse_length_us()
    );
    println!("Repeat: {}", config.repeat());
    println!("Bit length: {}\n", config.bit_length());

    if args.dry_run {
        let recorder = Recorder::new();
        let mut device = RfDevice::with_delay(recorder.line(), recorder.delay(), config);
        device.send(args.code)?;
        device.cleanup()?;

        let frame_len = device.bit_length() + 1;
        println!("Recorded {} waveforms", recorder.waveforms().len());
        for (i, (high, low)) in recorder.waveforms().iter().take(frame_len).enumerate() {
            println!("  {:>2}: high {:>6}µs  low {:>6}µs", i, high.as_micros(), low.as_micros());
        }
        return Ok(());
    }

    match &args.chip {
        Some(chip) => {
            let line = CdevLine::acquire_on(chip, args.gpio)?;
            println!("✓ Requested line {} on {}", line.offset(), chip);
            send(line, config, args.code)
        }
        None => {
            let line = SysfsLine::acquire_at(&args.gpio_root, args.gpio)?;
            println!("✓ Acquired GPIO {}", line.pin());
            send(line, config, args.code)
        }
    }
}

fn send<L: OutputLine>(line: L, config: RfConfig, code: u64) -> Result<(), Box<dyn std::error::Error>> {
    let mut device = RfDevice::new(line, config);
    let result = device.send(code);
    device.cleanup()?;
    result?;

    println!("✓ Sent {}", code);
    Ok(())
}
