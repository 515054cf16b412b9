//!
//! This library provides communication with a Teledyne T3AWG3252 arbitrary
//! waveform generator.
//!
//! <br>
//!
//! # Details
//!
//! - The instrument speaks SCPI over its raw LXI socket (port 5025) or a
//!   USB-CDC serial port.
//!
//! - Basic setup and connection
//!
//!   ```no_run
//!   use t3awgctrl::{Device, DEFAULT_PORT};
//!   #[tokio::main]
//!   async fn main() -> t3awgctrl::Result<()> {
//!       let mut device = Device::connect(("192.168.1.50", DEFAULT_PORT)).await?;
//!       eprintln!("Connected to: {}\n", device.ident().await?.model);
//!       Ok(())
//!   }
//!   ```
//!
//! - Uploading and playing an arbitrary trace
//!
//!   ```no_run
//!   use t3awgctrl::{configure_and_upload_channel, Device, DEFAULT_PORT};
//!   use t3awgctrl::proto::command::Channel;
//!   #[tokio::main]
//!   async fn main() -> t3awgctrl::Result<()> {
//!       let mut device = Device::connect(("192.168.1.50", DEFAULT_PORT)).await?;
//!       let samples = [0.0, 1.0, 0.0, 1.0];
//!       configure_and_upload_channel(
//!           &mut device, "temp1", &samples, 2.0, Some(1e9), Channel::One, true,
//!       )
//!       .await?;
//!       Ok(())
//!   }
//!   ```
//!
//! Every operation is one synchronous round trip on a single connection;
//! the instrument processes commands strictly in order. Share a `Device`
//! between tasks only behind a mutex.
//!

pub mod device;
pub mod proto;
pub mod waveform;

pub use device::{configure_and_upload_channel, Device};
pub use proto::Result;

/// Raw SCPI socket port of the instrument.
pub const DEFAULT_PORT: u16 = 5025;

/// Default baudrate for the USB-CDC port.
pub const DEFAULT_BAUDRATE: u32 = 115_200;

/// Instrument-local folder waveform text files are downloaded to before
/// being imported into the waveform list.
pub const DEFAULT_WAVEFORM_FOLDER: &str = "C:/Users/awg3000/Pictures/Saved Pictures/";
