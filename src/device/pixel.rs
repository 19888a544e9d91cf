use async_trait::async_trait;
use futures_util::SinkExt;
use serde::Serialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use super::{DeviceError, LedConnection, LedDevice};

/// An LED pixel display driven over a WebSocket link.
///
/// The panel accepts one JSON frame per command:
/// `{"cmd":"brightness","value":80}` and
/// `{"cmd":"text","value":"1850","color":"4E86B9"}`.
pub struct PixelDevice {
    url: String,
}

impl PixelDevice {
    pub fn new(url: &str) -> Self {
        PixelDevice {
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl LedDevice for PixelDevice {
    fn name(&self) -> &str {
        "pixel-display"
    }

    async fn connect(&self) -> Result<Box<dyn LedConnection>, DeviceError> {
        debug!("Connecting to LED device at {}", self.url);
        let (ws, _response) = connect_async(self.url.as_str())
            .await
            .map_err(|e| DeviceError::Connect(e.to_string()))?;
        Ok(Box::new(PixelConnection { ws }))
    }
}

#[derive(Serialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
enum Frame<'a> {
    Brightness { value: u8 },
    Text { value: &'a str, color: &'a str },
}

pub struct PixelConnection {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl PixelConnection {
    async fn send_frame(&mut self, frame: &Frame<'_>) -> Result<(), DeviceError> {
        let payload =
            serde_json::to_string(frame).map_err(|e| DeviceError::Send(e.to_string()))?;
        self.ws
            .send(Message::Text(payload))
            .await
            .map_err(|e| DeviceError::Send(e.to_string()))
    }
}

#[async_trait]
impl LedConnection for PixelConnection {
    async fn set_brightness(&mut self, level: u8) -> Result<(), DeviceError> {
        self.send_frame(&Frame::Brightness {
            value: level.min(100),
        })
        .await
    }

    async fn send_text(&mut self, text: &str, color: &str) -> Result<(), DeviceError> {
        debug!("LED text: {} (#{})", text, color);
        self.send_frame(&Frame::Text { value: text, color }).await
    }

    async fn disconnect(&mut self) -> Result<(), DeviceError> {
        match self.ws.close(None).await {
            Ok(()) => Ok(()),
            // The panel drops the link as soon as it acknowledges the close
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => Ok(()),
            Err(e) => Err(DeviceError::Disconnect(e.to_string())),
        }
    }
}
