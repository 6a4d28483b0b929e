//! Settings provider: bounded timer configuration, persisted as JSON.

use serde::{Deserialize, Serialize};
use std::{env, fs, io, ops::RangeInclusive, path::PathBuf};

pub const WORK_RANGE: RangeInclusive<u32> = 60..=3600;
pub const BREAK_RANGE: RangeInclusive<u32> = 60..=1800;
pub const CYCLE_RANGE: RangeInclusive<u32> = 1..=10;
pub const DURATION_STEP: u32 = 60;

#[derive(Serialize, Deserialize, Clone)]
pub struct Config {
    pub work_duration: u32,
    pub break_duration: u32,
    pub total_cycles: u32,
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_duration: 1500,
            break_duration: 300,
            total_cycles: 4,
            theme: "default".into(),
        }
    }
}

impl Config {
    /// Pulls every value back into its range and snaps durations to whole
    /// minutes. Runs at every boundary into the engine, so the engine never
    /// sees raw input.
    pub fn clamped(mut self) -> Self {
        self.work_duration = snap(self.work_duration, WORK_RANGE);
        self.break_duration = snap(self.break_duration, BREAK_RANGE);
        self.total_cycles = self.total_cycles.clamp(*CYCLE_RANGE.start(), *CYCLE_RANGE.end());
        self
    }

    pub fn load() -> Self {
        fs::read_to_string(config_path())
            .ok()
            .and_then(|s| serde_json::from_str::<Config>(&s).ok())
            .unwrap_or_default()
            .clamped()
    }

    pub fn save(&self) -> io::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)
    }
}

fn snap(value: u32, range: RangeInclusive<u32>) -> u32 {
    let value = value.clamp(*range.start(), *range.end());
    value - value % DURATION_STEP
}

fn config_path() -> PathBuf {
    match env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".config").join("tomate").join("config.json"),
        None => PathBuf::from("tomate-config.json"),
    }
}
