//! Interactive fallback mode: a numbered menu shown when no handle is
//! given on the command line.

use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use std::time::Duration;

use crate::config::{Config, DEFAULT_REFRESH_INTERVAL, MIN_REFRESH_INTERVAL};
use crate::shutdown_signal;
use crate::watch::Watcher;

pub async fn interactive(config: Config) -> Result<()> {
    let mut interval = config.watch.unwrap_or(DEFAULT_REFRESH_INTERVAL);
    // LED starts OFF in the menu so the tool works without the panel nearby.
    let mut led_enabled = false;
    let mut last_handle: Option<String> = None;

    loop {
        println!("\n{}", "=".repeat(40));
        println!("         ETHOS SCORE CLI");
        println!("{}", "=".repeat(40));
        if let Some(last) = &last_handle {
            println!("  Last user: @{}", last);
        }
        println!("  Refresh interval: {}s", interval);

        let toggle = format!("Toggle LED [{}]", if led_enabled { "ON" } else { "OFF" });
        let items = [
            "Check score (one-time)",
            "Watch score (auto-refresh)",
            "Change refresh interval",
            toggle.as_str(),
            "Quit",
        ];
        let selection = Select::new().items(&items).default(0).interact()?;

        match selection {
            0 => {
                let Some(handle) = prompt_new_handle()? else {
                    continue;
                };
                last_handle = Some(handle.clone());
                let watcher = Watcher::from_config(&config, led_enabled)?;
                if let Err(e) = watcher.display_once(&handle).await {
                    println!("Error: {}", e);
                }
            }
            1 => {
                let Some(handle) = prompt_handle(last_handle.as_deref())? else {
                    continue;
                };
                last_handle = Some(handle.clone());
                let watcher = Watcher::from_config(&config, led_enabled)?;
                if let Err(e) = watcher
                    .watch(&handle, Duration::from_secs(interval), shutdown_signal())
                    .await
                {
                    println!("Error: {}", e);
                }
            }
            2 => {
                let new_interval: u64 = Input::new()
                    .with_prompt(format!("New interval in seconds (current: {}s)", interval))
                    .validate_with(|value: &u64| {
                        if *value < MIN_REFRESH_INTERVAL {
                            Err(format!(
                                "Minimum interval is {} seconds",
                                MIN_REFRESH_INTERVAL
                            ))
                        } else {
                            Ok(())
                        }
                    })
                    .interact_text()?;
                interval = new_interval;
                println!("Interval set to {}s", interval);
            }
            3 => {
                if config.no_led {
                    println!("\nLED disabled by --no-led.");
                    continue;
                }
                led_enabled = !led_enabled;
                println!("\nLED display: {}", if led_enabled { "ON" } else { "OFF" });
                if led_enabled {
                    println!("Note: the panel must be reachable at {}", config.device_url);
                }
            }
            4 => {
                println!("\nGoodbye!");
                break;
            }
            _ => {}
        }
    }
    Ok(())
}

/// Ask for a handle, stripping any leading '@'. Empty input is rejected.
fn prompt_new_handle() -> Result<Option<String>> {
    let raw: String = Input::new()
        .with_prompt("Enter Twitter/X handle")
        .allow_empty(true)
        .interact_text()?;
    let handle = raw.trim().trim_start_matches('@').to_string();
    if handle.is_empty() {
        println!("Invalid handle");
        return Ok(None);
    }
    Ok(Some(handle))
}

/// Offer the previously used handle before asking for a new one.
fn prompt_handle(last: Option<&str>) -> Result<Option<String>> {
    if let Some(last) = last {
        let use_last = Confirm::new()
            .with_prompt(format!("Use @{}?", last))
            .default(true)
            .interact()?;
        if use_last {
            return Ok(Some(last.to_string()));
        }
    }
    prompt_new_handle()
}
