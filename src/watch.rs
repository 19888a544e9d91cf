use chrono::Local;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{Config, DeviceErrorPolicy};
use crate::device::{DeviceError, LedConnection, LedDevice, NoopDevice, PixelDevice};
use crate::ethos::{EthosApi, Profile, ScoreSource};
use crate::tiers::{classify, Tier};

/// How long a one-shot display keeps the panel before releasing it.
const ONE_SHOT_HOLD: Duration = Duration::from_secs(2);

/// Fetches, classifies, and renders scores. One instance drives both the
/// one-shot lookup and the long-running watch session.
pub struct Watcher {
    source: Arc<dyn ScoreSource>,
    device: Arc<dyn LedDevice>,
    render_enabled: bool,
    brightness: u8,
    on_device_error: DeviceErrorPolicy,
}

impl Watcher {
    pub fn new(
        source: Arc<dyn ScoreSource>,
        device: Arc<dyn LedDevice>,
        render_enabled: bool,
        brightness: u8,
        on_device_error: DeviceErrorPolicy,
    ) -> Self {
        Watcher {
            source,
            device,
            render_enabled,
            brightness,
            on_device_error,
        }
    }

    pub fn from_config(config: &Config, render_enabled: bool) -> anyhow::Result<Self> {
        let source = Arc::new(EthosApi::new(&config.api_url)?);
        let device: Arc<dyn LedDevice> = if render_enabled {
            Arc::new(PixelDevice::new(&config.device_url))
        } else {
            Arc::new(NoopDevice)
        };
        Ok(Watcher::new(
            source,
            device,
            render_enabled,
            config.brightness,
            config.on_device_error,
        ))
    }

    /// Look up a handle once and, when rendering is enabled, show the score
    /// on a connection opened and released within this call.
    ///
    /// Returns `Ok(None)` when the fetch failed (already reported); the
    /// device is never touched on that path.
    pub async fn display_once(&self, handle: &str) -> Result<Option<i64>, DeviceError> {
        let Some((profile, tier)) = self.lookup(handle).await else {
            return Ok(None);
        };

        if !self.render_enabled {
            return Ok(Some(profile.score));
        }

        // Scoped acquisition: this call opened the connection, so it must
        // also release it before returning, even when the render fails.
        println!("\nConnecting to LED device...");
        let mut conn = self.device.connect().await?;
        println!("Connected!");

        println!("Displaying on LED: {}", profile.score);
        let rendered = self.render(conn.as_mut(), profile.score, tier).await;
        if rendered.is_ok() {
            // Leave the text up long enough to read before the panel clears.
            tokio::time::sleep(ONE_SHOT_HOLD).await;
        }
        let closed = conn.disconnect().await;
        rendered?;
        closed?;
        println!("Done!");

        Ok(Some(profile.score))
    }

    /// Poll the handle on a fixed interval until `shutdown` completes.
    ///
    /// With rendering enabled a single device connection is acquired up
    /// front and reused for every iteration; it is released unconditionally
    /// when the session ends, whether by shutdown or by a device fault.
    pub async fn watch(
        &self,
        handle: &str,
        interval: Duration,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), DeviceError> {
        println!("\n{}", "=".repeat(40));
        println!("WATCHING @{}", handle);
        println!("Refresh interval: {}s | Ctrl+C to stop", interval.as_secs());
        println!("LED: {}", if self.render_enabled { "ON" } else { "OFF" });
        println!("{}", "=".repeat(40));
        info!(
            "Watch session for @{} via {} (interval={:?})",
            handle,
            self.source.name(),
            interval
        );

        let mut conn: Option<Box<dyn LedConnection>> = if self.render_enabled {
            println!("\nConnecting to LED device...");
            let c = self.device.connect().await?;
            debug!("Holding one {} connection for the session", self.device.name());
            println!("Connected! Starting watch mode...\n");
            Some(c)
        } else {
            println!("\nStarting watch mode (score only)...\n");
            None
        };

        tokio::pin!(shutdown);
        let result = self
            .poll_loop(handle, interval, &mut conn, shutdown.as_mut())
            .await;

        // Release the panel on every exit path, fault and shutdown alike.
        if let Some(mut held) = conn.take() {
            if let Err(e) = held.disconnect().await {
                warn!("LED disconnect during shutdown failed: {}", e);
            }
        }
        println!("Goodbye!");
        result
    }

    async fn poll_loop<F>(
        &self,
        handle: &str,
        interval: Duration,
        conn: &mut Option<Box<dyn LedConnection>>,
        mut shutdown: Pin<&mut F>,
    ) -> Result<(), DeviceError>
    where
        F: Future<Output = ()>,
    {
        let mut last_score: Option<i64> = None;

        loop {
            let score = match self.lookup(handle).await {
                Some((profile, tier)) => {
                    if let Some(held) = conn.as_deref_mut() {
                        println!("Displaying on LED: {}", profile.score);
                        if let Err(e) = self.render(held, profile.score, tier).await {
                            match self.on_device_error {
                                DeviceErrorPolicy::Abort => return Err(e),
                                DeviceErrorPolicy::Continue => {
                                    warn!(
                                        "{}; rendering disabled for the rest of this session",
                                        e
                                    );
                                    if let Some(mut dead) = conn.take() {
                                        if let Err(e) = dead.disconnect().await {
                                            debug!("LED disconnect after fault failed: {}", e);
                                        }
                                    }
                                }
                            }
                        }
                    }
                    Some(profile.score)
                }
                None => None,
            };

            if let Some(delta) = score_delta(last_score, score) {
                println!("  -> Score changed: {:+}", delta);
            }
            last_score = score;

            println!("\nNext refresh in {}s...", interval.as_secs());
            tokio::select! {
                _ = &mut shutdown => {
                    println!("\n\nStopping watch mode...");
                    return Ok(());
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }

    /// Fetch and report one score. Fetch failures are reported here and
    /// yield `None`; the poll cycle treats them as a skipped iteration.
    async fn lookup(&self, handle: &str) -> Option<(Profile, Tier)> {
        let stamp = Local::now().format("%H:%M:%S");
        println!("\n[{}] Looking up @{}...", stamp, handle);

        match self.source.fetch_score(handle).await {
            Ok(profile) => {
                let tier = classify(profile.score);
                println!("User: {} (@{})", profile.display_name, profile.username);
                println!("Score: {}", profile.score);
                println!("Tier: {} (#{})", tier.name, tier.color);
                Some((profile, tier))
            }
            Err(e) => {
                println!("Error: {}", e);
                None
            }
        }
    }

    async fn render(
        &self,
        conn: &mut dyn LedConnection,
        score: i64,
        tier: Tier,
    ) -> Result<(), DeviceError> {
        conn.set_brightness(self.brightness).await?;
        conn.send_text(&score.to_string(), tier.color).await
    }
}

/// Signed change between two successive polls. Reported only when both
/// polls produced a score and they differ; a failed poll clears the
/// baseline so stale data never feeds a delta.
fn score_delta(prev: Option<i64>, curr: Option<i64>) -> Option<i64> {
    match (prev, curr) {
        (Some(p), Some(c)) if p != c => Some(c - p),
        _ => None,
    }
}
