//! Simulation configuration: surface, ammunition, projectile sizes and the
//! actor layout.  Every field has a default, so a JSON file only needs the
//! values it changes.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entities::{Point, Rect, Size};

pub const DEFAULT_ARROWS: u32 = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub surface: Size,
    pub arrows_per_match: u32,
    /// Where arrows leave the bow.
    pub bow_anchor: Point,
    pub arrow_size: Size,
    pub shell_size: Size,
    pub rocket_size: Size,
    pub layout: Layout,
}

/// Resting positions of the actors.  Moving actors animate around these.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub target: Rect,
    pub cow_a: Rect,
    pub cow_b: Rect,
    /// Horizontal grazing amplitude of each cow.
    pub cow_a_roam: f64,
    pub cow_b_roam: f64,
    pub tank: Rect,
    pub launcher: Rect,
    pub plane_size: Size,
    /// Top edge of the plane on each lane.
    pub high_lane_y: f64,
    pub low_lane_y: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            surface: Size::new(1000.0, 600.0),
            arrows_per_match: DEFAULT_ARROWS,
            bow_anchor: Point::new(80.0, 300.0),
            arrow_size: Size::new(30.0, 4.0),
            shell_size: Size::new(14.0, 14.0),
            rocket_size: Size::new(28.0, 10.0),
            layout: Layout::default(),
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            target: Rect::new(400.0, 280.0, 120.0, 120.0),
            cow_a: Rect::new(220.0, 500.0, 90.0, 60.0),
            cow_b: Rect::new(340.0, 490.0, 90.0, 60.0),
            cow_a_roam: 40.0,
            cow_b_roam: 50.0,
            tank: Rect::new(600.0, 530.0, 110.0, 60.0),
            launcher: Rect::new(850.0, 510.0, 70.0, 80.0),
            plane_size: Size::new(100.0, 50.0),
            high_lane_y: 40.0,
            low_lane_y: 220.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    Io { path: String, message: String },
    Parse { message: String },
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read config {path}: {message}"),
            Self::Parse { message } => write!(f, "malformed config: {message}"),
            Self::Invalid { field, reason } => write!(f, "invalid config field `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl SimConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(raw).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_size("surface", self.surface)?;
        check_size("arrow_size", self.arrow_size)?;
        check_size("shell_size", self.shell_size)?;
        check_size("rocket_size", self.rocket_size)?;
        check_size("layout.plane_size", self.layout.plane_size)?;

        if self.arrows_per_match == 0 {
            return Err(ConfigError::Invalid {
                field: "arrows_per_match",
                reason: "must be at least 1".to_string(),
            });
        }

        let bounds = Rect::new(0.0, 0.0, self.surface.width, self.surface.height);
        if !contains_point(&bounds, self.bow_anchor) {
            return Err(ConfigError::Invalid {
                field: "bow_anchor",
                reason: "must lie on the play surface".to_string(),
            });
        }

        let actors = [
            ("layout.target", &self.layout.target),
            ("layout.cow_a", &self.layout.cow_a),
            ("layout.cow_b", &self.layout.cow_b),
            ("layout.tank", &self.layout.tank),
            ("layout.launcher", &self.layout.launcher),
        ];
        for (field, rect) in actors {
            if rect.width() <= 0.0 || rect.height() <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must have a positive size".to_string(),
                });
            }
            if !contains_rect(&bounds, rect) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must lie inside the play surface".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn check_size(field: &'static str, size: Size) -> Result<(), ConfigError> {
    if size.width > 0.0 && size.height > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{}x{} is not a positive size", size.width, size.height),
        })
    }
}

fn contains_point(bounds: &Rect, p: Point) -> bool {
    p.x >= bounds.left && p.x <= bounds.right && p.y >= bounds.top && p.y <= bounds.bottom
}

fn contains_rect(bounds: &Rect, r: &Rect) -> bool {
    r.left >= bounds.left && r.right <= bounds.right && r.top >= bounds.top && r.bottom <= bounds.bottom
}
