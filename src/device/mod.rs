pub mod noop;
pub mod pixel;

pub use noop::NoopDevice;
pub use pixel::PixelDevice;

use async_trait::async_trait;
use thiserror::Error;

/// A failed LED device operation. Surfaced to the caller, never a crash.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeviceError {
    #[error("LED connect failed: {0}")]
    Connect(String),
    #[error("LED send failed: {0}")]
    Send(String),
    #[error("LED disconnect failed: {0}")]
    Disconnect(String),
}

/// An addressable LED display reachable over a wireless link.
///
/// Implementations are selected once at startup; everything downstream
/// talks through this interface regardless of whether a real device is
/// present.
#[async_trait]
pub trait LedDevice: Send + Sync {
    /// Open a connection to the device.
    async fn connect(&self) -> Result<Box<dyn LedConnection>, DeviceError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// One open connection to an LED display.
#[async_trait]
pub trait LedConnection: Send {
    /// Set the panel brightness (0-100).
    async fn set_brightness(&mut self, level: u8) -> Result<(), DeviceError>;

    /// Show `text` in the given color (hex, no leading '#').
    async fn send_text(&mut self, text: &str, color: &str) -> Result<(), DeviceError>;

    /// Close the connection. Safe to call on an already-closed link.
    async fn disconnect(&mut self) -> Result<(), DeviceError>;
}
