//! Audit configuration — window length and the uniform cost assumption.
//!
//! Both values are validated when the config is built, so the pipeline
//! never sees an unsupported window or a negative cost.

use crate::error::{AuditError, AuditResult};
use crate::types::Amount;
use chrono::Duration;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COST_PER_UNIT: Amount = 300.0;

/// Trailing audit period, ending at the latest known order date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum AuditWindow {
    #[default]
    Last7Days,
    Last30Days,
    Last90Days,
}

impl AuditWindow {
    pub const ALL: [AuditWindow; 3] = [
        AuditWindow::Last7Days,
        AuditWindow::Last30Days,
        AuditWindow::Last90Days,
    ];

    pub fn days(self) -> u32 {
        match self {
            AuditWindow::Last7Days  => 7,
            AuditWindow::Last30Days => 30,
            AuditWindow::Last90Days => 90,
        }
    }

    pub fn duration(self) -> Duration {
        Duration::days(i64::from(self.days()))
    }
}

impl TryFrom<u32> for AuditWindow {
    type Error = AuditError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        match days {
            7  => Ok(AuditWindow::Last7Days),
            30 => Ok(AuditWindow::Last30Days),
            90 => Ok(AuditWindow::Last90Days),
            _  => Err(AuditError::InvalidWindow { days }),
        }
    }
}

impl From<AuditWindow> for u32 {
    fn from(window: AuditWindow) -> Self {
        window.days()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AuditConfig {
    pub window: AuditWindow,
    pub cost_per_unit: Amount,
}

/// On-disk shape of an audit config file. Every key is optional.
#[derive(Debug, Clone, Deserialize)]
struct AuditConfigFile {
    #[serde(default)]
    audit_window_days: Option<u32>,
    #[serde(default)]
    cost_per_unit: Option<Amount>,
}

impl AuditConfig {
    pub fn new(window_days: u32, cost_per_unit: Amount) -> AuditResult<Self> {
        let window = AuditWindow::try_from(window_days)?;
        Self::with_window(window, cost_per_unit)
    }

    pub fn with_window(window: AuditWindow, cost_per_unit: Amount) -> AuditResult<Self> {
        if !cost_per_unit.is_finite() || cost_per_unit < 0.0 {
            return Err(AuditError::InvalidCostPerUnit { value: cost_per_unit });
        }
        Ok(Self { window, cost_per_unit })
    }

    /// Load from a JSON file such as
    /// `{"audit_window_days": 30, "cost_per_unit": 250.0}`.
    /// Missing keys fall back to the defaults.
    pub fn load(path: &str) -> AuditResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> AuditResult<Self> {
        let file: AuditConfigFile = serde_json::from_str(content)?;
        let defaults = Self::default();
        let window = match file.audit_window_days {
            Some(days) => AuditWindow::try_from(days)?,
            None => defaults.window,
        };
        Self::with_window(window, file.cost_per_unit.unwrap_or(defaults.cost_per_unit))
    }

    /// Config with fixed values for use in tests: 90-day window, 300 per unit.
    pub fn default_test() -> Self {
        Self {
            window: AuditWindow::Last90Days,
            cost_per_unit: DEFAULT_COST_PER_UNIT,
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            window: AuditWindow::default(),
            cost_per_unit: DEFAULT_COST_PER_UNIT,
        }
    }
}
