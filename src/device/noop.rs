use async_trait::async_trait;
use tracing::debug;

use super::{DeviceError, LedConnection, LedDevice};

/// Stand-in device used when rendering is disabled. Accepts every
/// operation and does nothing.
pub struct NoopDevice;

#[async_trait]
impl LedDevice for NoopDevice {
    fn name(&self) -> &str {
        "noop"
    }

    async fn connect(&self) -> Result<Box<dyn LedConnection>, DeviceError> {
        debug!("LED rendering disabled, using no-op device");
        Ok(Box::new(NoopConnection))
    }
}

struct NoopConnection;

#[async_trait]
impl LedConnection for NoopConnection {
    async fn set_brightness(&mut self, _level: u8) -> Result<(), DeviceError> {
        Ok(())
    }

    async fn send_text(&mut self, _text: &str, _color: &str) -> Result<(), DeviceError> {
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), DeviceError> {
        Ok(())
    }
}
