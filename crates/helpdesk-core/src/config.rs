use crate::error::{HelpdeskError, Result};
use crate::paths;
use crate::report;
use crate::types::Priority;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// SlaConfig
// ---------------------------------------------------------------------------

/// Targets above ten years are rejected by [`Config::validate`].
pub const MAX_TARGET_HOURS: u32 = 24 * 365 * 10;

/// Response and resolution targets for one priority, in hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaTarget {
    pub response_hours: u32,
    pub resolve_hours: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaConfig {
    #[serde(default = "default_high")]
    pub high: SlaTarget,
    #[serde(default = "default_medium")]
    pub medium: SlaTarget,
    #[serde(default = "default_low")]
    pub low: SlaTarget,
    /// Open tickets within this many hours of their resolve deadline are "due soon".
    #[serde(default = "default_due_soon_hours")]
    pub due_soon_hours: u32,
}

fn default_high() -> SlaTarget {
    SlaTarget {
        response_hours: 1,
        resolve_hours: 8,
    }
}

fn default_medium() -> SlaTarget {
    SlaTarget {
        response_hours: 4,
        resolve_hours: 24,
    }
}

fn default_low() -> SlaTarget {
    SlaTarget {
        response_hours: 8,
        resolve_hours: 72,
    }
}

fn default_due_soon_hours() -> u32 {
    4
}

impl Default for SlaConfig {
    fn default() -> Self {
        Self {
            high: default_high(),
            medium: default_medium(),
            low: default_low(),
            due_soon_hours: default_due_soon_hours(),
        }
    }
}

impl SlaConfig {
    /// Legacy priorities are held to the medium target.
    pub fn target_for(&self, priority: &Priority) -> SlaTarget {
        match priority {
            Priority::High => self.high,
            Priority::Medium | Priority::Legacy(_) => self.medium,
            Priority::Low => self.low,
        }
    }
}

// ---------------------------------------------------------------------------
// ReportConfig / ActivityConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_window_months")]
    pub window_months: u32,
}

fn default_window_months() -> u32 {
    crate::report::DEFAULT_WINDOW
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            window_months: default_window_months(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_max_entries() -> usize {
    200
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}

// ---------------------------------------------------------------------------
// HelpdeskInfo
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpdeskInfo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub helpdesk: HelpdeskInfo,
    #[serde(default)]
    pub sla: SlaConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub activity: ActivityConfig,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: 1,
            helpdesk: HelpdeskInfo {
                name: name.into(),
                description: None,
            },
            sla: SlaConfig::default(),
            report: ReportConfig::default(),
            activity: ActivityConfig::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(HelpdeskError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        crate::migrations::migrate_config(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        for priority in Priority::all() {
            let target = self.sla.target_for(&priority);
            if target.response_hours == 0 || target.resolve_hours == 0 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "sla.{priority} has a zero-hour target; every ticket would be overdue on creation"
                    ),
                });
            }
            let longest = target.response_hours.max(target.resolve_hours);
            if longest > MAX_TARGET_HOURS {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "sla.{priority} target of {longest}h exceeds the {MAX_TARGET_HOURS}h maximum; ticket creation will fail"
                    ),
                });
            }
            if target.response_hours > target.resolve_hours {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "sla.{priority}: response_hours ({}) exceeds resolve_hours ({})",
                        target.response_hours, target.resolve_hours
                    ),
                });
            }
        }

        let high = self.sla.high.resolve_hours;
        let low = self.sla.low.resolve_hours;
        if high > low {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "sla.high.resolve_hours ({high}) is longer than sla.low.resolve_hours ({low})"
                ),
            });
        }

        match self.report.window_months {
            0 => warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "report.window_months is 0; monthly reports will be empty".to_string(),
            }),
            n if n > report::MAX_WINDOW => warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "report.window_months={n} exceeds the maximum of {}; reports are capped",
                    report::MAX_WINDOW
                ),
            }),
            n if n > 36 => warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("report.window_months={n} (>36 is unusual)"),
            }),
            _ => {}
        }

        if self.activity.max_entries == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "activity.max_entries is 0; the activity log will stay empty".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
