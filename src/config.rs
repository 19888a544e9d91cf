use anyhow::Context;
use clap::{Parser, ValueEnum};
use url::Url;

pub const DEFAULT_REFRESH_INTERVAL: u64 = 60;
pub const MIN_REFRESH_INTERVAL: u64 = 10;

/// Ethos score CLI with optional LED pixel-display rendering
#[derive(Parser, Debug, Clone)]
#[command(name = "ethos-led", version, about)]
pub struct Config {
    /// Twitter/X handle to look up (omit for the interactive menu)
    pub handle: Option<String>,

    /// Re-check the score on an interval instead of a one-shot lookup
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        num_args = 0..=1,
        default_missing_value = "60"
    )]
    pub watch: Option<u64>,

    /// Print the score only, never touch the LED device
    #[arg(long, env = "NO_LED", default_value = "false")]
    pub no_led: bool,

    /// Ethos API base URL
    #[arg(
        long,
        env = "ETHOS_API_URL",
        default_value = "https://api.ethos.network/api/v2/user/by/x"
    )]
    pub api_url: String,

    /// LED pixel-display WebSocket address
    #[arg(long, env = "LED_DEVICE_URL", default_value = "ws://ethos-pixel.local:81/ws")]
    pub device_url: String,

    /// Panel brightness while a score is shown (0-100)
    #[arg(long, env = "LED_BRIGHTNESS", default_value = "80")]
    pub brightness: u8,

    /// What to do when the LED device fails mid-watch
    #[arg(long, env = "ON_DEVICE_ERROR", value_enum, default_value = "continue")]
    pub on_device_error: DeviceErrorPolicy,
}

/// Recovery policy for a failed LED operation during a watch session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeviceErrorPolicy {
    /// Report the failure and keep polling with rendering off
    Continue,
    /// End the watch session
    Abort,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(interval) = self.watch {
            if interval < MIN_REFRESH_INTERVAL {
                anyhow::bail!(
                    "Minimum refresh interval is {} seconds",
                    MIN_REFRESH_INTERVAL
                );
            }
        }
        if self.brightness > 100 {
            anyhow::bail!("brightness must be between 0 and 100");
        }
        let api = Url::parse(&self.api_url).context("Invalid Ethos API URL")?;
        if !matches!(api.scheme(), "http" | "https") {
            anyhow::bail!("Ethos API URL must use http or https");
        }
        let device = Url::parse(&self.device_url).context("Invalid LED device URL")?;
        if !matches!(device.scheme(), "ws" | "wss") {
            anyhow::bail!("LED device URL must use ws or wss");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["ethos-led", "alice"]).unwrap();
        assert_eq!(config.handle.as_deref(), Some("alice"));
        assert_eq!(config.watch, None);
        assert!(!config.no_led);
        assert_eq!(config.brightness, 80);
        assert_eq!(config.on_device_error, DeviceErrorPolicy::Continue);
        config.validate().unwrap();
    }

    #[test]
    fn test_watch_without_value_uses_default_interval() {
        let config = Config::try_parse_from(["ethos-led", "alice", "--watch"]).unwrap();
        assert_eq!(config.watch, Some(DEFAULT_REFRESH_INTERVAL));
    }

    #[test]
    fn test_watch_interval_override() {
        let config = Config::try_parse_from(["ethos-led", "alice", "--watch", "30"]).unwrap();
        assert_eq!(config.watch, Some(30));
        config.validate().unwrap();
    }

    #[test]
    fn test_interval_below_minimum_rejected() {
        let config = Config::try_parse_from(["ethos-led", "alice", "--watch", "5"]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_brightness_out_of_range_rejected() {
        let config =
            Config::try_parse_from(["ethos-led", "alice", "--brightness", "150"]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_device_url_must_be_websocket() {
        let config = Config::try_parse_from([
            "ethos-led",
            "alice",
            "--device-url",
            "http://ethos-pixel.local:81",
        ])
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_abort_policy_parses() {
        let config =
            Config::try_parse_from(["ethos-led", "alice", "--on-device-error", "abort"]).unwrap();
        assert_eq!(config.on_device_error, DeviceErrorPolicy::Abort);
    }
}
