use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Settings for the ball trajectory predictor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionSettings {
    /// How far ahead to predict, in seconds.
    pub horizon_secs: f64,
    /// Time between predicted slices, in seconds.
    pub step_secs: f64,
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self {
            horizon_secs: 6.0,
            step_secs: 1.0 / 60.0,
        }
    }
}

/// Settings for the car reachability model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReachabilitySettings {
    /// Length of the simulated acceleration curve, in seconds.
    pub horizon_secs: f64,
}

impl Default for ReachabilitySettings {
    fn default() -> Self {
        Self { horizon_secs: 4.0 }
    }
}

/// Tuning for the maneuvers run by the plan engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManeuverSettings {
    /// Seconds an intercept attempt may run before it gives up.
    pub intercept_lifespan_secs: f64,
    /// Drift in uu after which a ground intercept is abandoned.
    pub intercept_disruption_threshold: f64,
    /// Drift in uu after which an aerial intercept counts as disrupted.
    pub midair_disruption_threshold: f64,
    /// Disrupted ticks an aerial tolerates before quitting.
    pub max_confusion: u32,
    /// Boost the catch maneuver is allowed to spend.
    pub catch_boost_budget: f64,
}

impl Default for ManeuverSettings {
    fn default() -> Self {
        Self {
            intercept_lifespan_secs: 5.0,
            intercept_disruption_threshold: 200.0,
            midair_disruption_threshold: 1500.0,
            max_confusion: 3,
            catch_boost_budget: 0.0,
        }
    }
}

/// Settings for a single bot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotSettings {
    pub prediction: PredictionSettings,
    pub reachability: ReachabilitySettings,
    pub maneuver: ManeuverSettings,
}

impl BotSettings {
    /// Load the settings from a file, or store the default settings if the file does
    /// not exist. A file that exists but cannot be parsed yields the defaults.
    pub fn load_or_insert(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => Ok(settings),
                Err(err) => {
                    log::warn!("Failed to parse settings {}: {}", path.display(), err);
                    Ok(Self::default())
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let settings = Self::default();
                settings.store(path)?;
                log::info!("Wrote default settings to {}", path.display());
                Ok(settings)
            }
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read settings {}", path.display()))
            }
        }
    }

    /// Store the settings in the given file.
    pub fn store(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write settings {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_or_insert_writes_defaults() {
        let path = std::env::temp_dir().join(format!(
            "kestrel-settings-test-{}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        let settings = BotSettings::load_or_insert(&path).unwrap();
        assert_eq!(settings, BotSettings::default());
        assert!(path.exists());

        let reloaded = BotSettings::load_or_insert(&path).unwrap();
        assert_eq!(reloaded, settings);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let settings: BotSettings =
            serde_json::from_str(r#"{ "maneuver": { "max_confusion": 5 } }"#).unwrap();
        assert_eq!(settings.maneuver.max_confusion, 5);
        assert_eq!(settings.prediction, PredictionSettings::default());
    }
}
