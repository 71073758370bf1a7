use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use crate::zones::Zone;

const DEFAULT_COOLDOWN_SECS: u64 = 30;
const DEFAULT_MAX_AGE: u32 = 15;
const DEFAULT_IOU_THRESHOLD: f32 = 0.3;

#[derive(Debug, Deserialize, Default)]
struct VigilConfigFile {
    alerting: Option<AlertConfigFile>,
    tracker: Option<TrackerConfigFile>,
    zones: Option<Vec<Zone>>,
}

#[derive(Debug, Deserialize, Default)]
struct AlertConfigFile {
    enabled: Option<bool>,
    target_classes: Option<Vec<u32>>,
    cooldown_seconds: Option<u64>,
    webhooks: Option<Vec<WebhookConfigFile>>,
}

#[derive(Debug, Deserialize)]
struct WebhookConfigFile {
    url: String,
}

#[derive(Debug, Deserialize, Default)]
struct TrackerConfigFile {
    max_age: Option<u32>,
    iou_match_threshold: Option<f32>,
}

/// Resolved runtime configuration for the control core.
#[derive(Debug, Clone, Default)]
pub struct VigilConfig {
    pub alerting: AlertSettings,
    pub tracker: TrackerSettings,
    pub zones: Vec<Zone>,
}

#[derive(Debug, Clone)]
pub struct AlertSettings {
    pub enabled: bool,
    pub target_classes: HashSet<u32>,
    pub cooldown: Duration,
    pub webhooks: Vec<String>,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            target_classes: HashSet::new(),
            cooldown: Duration::from_secs(DEFAULT_COOLDOWN_SECS),
            webhooks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub max_age: u32,
    pub iou_match_threshold: f32,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            max_age: DEFAULT_MAX_AGE,
            iou_match_threshold: DEFAULT_IOU_THRESHOLD,
        }
    }
}

impl VigilConfig {
    /// Load from the file named by `VIGIL_CONFIG` (if set), then apply env
    /// overrides and validate.
    pub fn load() -> Result<Self> {
        let file_cfg = match std::env::var("VIGIL_CONFIG").ok().as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from an explicit path, then apply env overrides and validate.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut cfg = Self::from_file(read_config_file(path)?);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: VigilConfigFile) -> Self {
        let alerting = file.alerting.unwrap_or_default();
        let tracker = file.tracker.unwrap_or_default();
        Self {
            alerting: AlertSettings {
                enabled: alerting.enabled.unwrap_or(false),
                target_classes: alerting
                    .target_classes
                    .unwrap_or_default()
                    .into_iter()
                    .collect(),
                cooldown: Duration::from_secs(
                    alerting.cooldown_seconds.unwrap_or(DEFAULT_COOLDOWN_SECS),
                ),
                webhooks: alerting
                    .webhooks
                    .unwrap_or_default()
                    .into_iter()
                    .map(|wh| wh.url)
                    .collect(),
            },
            tracker: TrackerSettings {
                max_age: tracker.max_age.unwrap_or(DEFAULT_MAX_AGE),
                iou_match_threshold: tracker
                    .iou_match_threshold
                    .unwrap_or(DEFAULT_IOU_THRESHOLD),
            },
            zones: file.zones.unwrap_or_default(),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(enabled) = std::env::var("VIGIL_ALERT_ENABLED") {
            self.alerting.enabled = parse_bool(&enabled)
                .ok_or_else(|| anyhow!("VIGIL_ALERT_ENABLED must be a boolean"))?;
        }
        if let Ok(classes) = std::env::var("VIGIL_TARGET_CLASSES") {
            let parsed: HashSet<u32> = split_csv(&classes)
                .iter()
                .map(|entry| {
                    entry.parse().map_err(|_| {
                        anyhow!("VIGIL_TARGET_CLASSES must be comma-separated class ids")
                    })
                })
                .collect::<Result<_>>()?;
            if !parsed.is_empty() {
                self.alerting.target_classes = parsed;
            }
        }
        if let Ok(cooldown) = std::env::var("VIGIL_COOLDOWN_SECS") {
            let seconds: u64 = cooldown
                .parse()
                .map_err(|_| anyhow!("VIGIL_COOLDOWN_SECS must be an integer number of seconds"))?;
            self.alerting.cooldown = Duration::from_secs(seconds);
        }
        if let Ok(webhooks) = std::env::var("VIGIL_WEBHOOKS") {
            let parsed = split_csv(&webhooks);
            if !parsed.is_empty() {
                self.alerting.webhooks = parsed;
            }
        }
        if let Ok(max_age) = std::env::var("VIGIL_MAX_AGE") {
            self.tracker.max_age = max_age
                .parse()
                .map_err(|_| anyhow!("VIGIL_MAX_AGE must be an integer frame count"))?;
        }
        if let Ok(threshold) = std::env::var("VIGIL_IOU_THRESHOLD") {
            self.tracker.iou_match_threshold = threshold
                .parse()
                .map_err(|_| anyhow!("VIGIL_IOU_THRESHOLD must be a number"))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.tracker.iou_match_threshold) {
            return Err(anyhow!("tracker.iou_match_threshold must be in [0, 1]"));
        }
        for zone in &self.zones {
            for vertex in &zone.polygon {
                if !vertex.iter().all(|c| (0.0..=1.0).contains(c)) {
                    return Err(anyhow!(
                        "zone '{}' has a vertex outside normalized [0, 1] coordinates",
                        zone.name
                    ));
                }
            }
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<VigilConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.to_string())
        .collect()
}
