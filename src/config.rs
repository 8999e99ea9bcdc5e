//! Data-driven game balance
//!
//! Every constant the simulation reads lives in [`Tuning`]. Two rulesets ship:
//! the magnetic one (parcels drift toward a nearby postman) and the classic
//! one (bigger field, box pickups, no magnet).

use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating a [`Tuning`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: `{field}` {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    #[error("unknown ruleset `{0}` (expected `magnetic` or `classic`)")]
    UnknownRuleset(String),
}

/// How a parcel or the post office decides the postman is touching it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitShape {
    /// Euclidean distance below the collection radius
    #[default]
    Circle,
    /// Both axis offsets below the collection radius
    Box,
}

/// Ruleset presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ruleset {
    /// Compact field with parcel magnet
    #[default]
    Magnetic,
    /// Wide field, box pickups, no magnet
    Classic,
}

impl Ruleset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ruleset::Magnetic => "magnetic",
            Ruleset::Classic => "classic",
        }
    }
}

impl FromStr for Ruleset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "magnetic" | "magnet" => Ok(Ruleset::Magnetic),
            "classic" => Ok(Ruleset::Classic),
            _ => Err(ConfigError::UnknownRuleset(s.to_string())),
        }
    }
}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    /// Random spawns stay this far from every edge
    pub spawn_margin: f32,

    // === Postman ===
    /// Distance moved per tick
    pub player_speed: f32,
    pub player_start: Vec2,
    pub starting_lives: u32,

    // === Parcels and delivery ===
    pub post_office: Vec2,
    pub collection_radius: f32,
    pub parcel_hit: HitShape,
    /// Magnet range; ignored when `attraction_strength` is zero
    pub attraction_radius: f32,
    /// Fraction of the offset a parcel moves toward the postman per tick
    pub attraction_strength: f32,
    pub parcels_per_level: u32,

    // === Obstacles ===
    /// Half-extent of the obstacle hit box
    pub obstacle_box: f32,
    pub obstacles_per_level: u32,

    // === Scoring ===
    pub parcel_bonus: u32,
    pub delivery_bonus: u32,

    // === Timing ===
    pub tick_period_ms: u64,
    pub invulnerable_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            spawn_margin: SPAWN_MARGIN,

            player_speed: PLAYER_SPEED,
            player_start: Vec2::new(PLAYER_START.0, PLAYER_START.1),
            starting_lives: STARTING_LIVES,

            post_office: Vec2::new(POST_OFFICE.0, POST_OFFICE.1),
            collection_radius: COLLECTION_RADIUS,
            parcel_hit: HitShape::Circle,
            attraction_radius: ATTRACTION_RADIUS,
            attraction_strength: ATTRACTION_STRENGTH,
            parcels_per_level: PARCELS_PER_LEVEL,

            obstacle_box: OBSTACLE_BOX,
            obstacles_per_level: OBSTACLES_PER_LEVEL,

            parcel_bonus: PARCEL_BONUS,
            delivery_bonus: DELIVERY_BONUS,

            tick_period_ms: TICK_PERIOD_MS,
            invulnerable_ms: INVULNERABLE_MS,
        }
    }
}

impl Tuning {
    /// Tuning for a ruleset preset
    pub fn for_ruleset(ruleset: Ruleset) -> Self {
        match ruleset {
            Ruleset::Magnetic => Self::default(),
            Ruleset::Classic => Self {
                field_width: 600.0,
                field_height: 500.0,
                post_office: Vec2::new(550.0, 450.0),
                collection_radius: 40.0,
                parcel_hit: HitShape::Box,
                attraction_strength: 0.0,
                ..Self::default()
            },
        }
    }

    /// Parse and validate tuning from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Whether parcels drift toward the postman
    pub fn magnet_enabled(&self) -> bool {
        self.attraction_strength > 0.0
    }

    /// Check that the simulation can run with these values
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }

        if self.spawn_margin < 0.0 {
            return invalid("spawn_margin", "must not be negative");
        }
        if self.field_width <= 2.0 * self.spawn_margin {
            return invalid("field_width", "must exceed twice the spawn margin");
        }
        if self.field_height <= 2.0 * self.spawn_margin {
            return invalid("field_height", "must exceed twice the spawn margin");
        }
        if self.player_speed <= 0.0 {
            return invalid("player_speed", "must be positive");
        }
        if !self.in_field(self.player_start) {
            return invalid("player_start", "must lie inside the field");
        }
        if !self.in_field(self.post_office) {
            return invalid("post_office", "must lie inside the field");
        }
        if self.starting_lives == 0 {
            return invalid("starting_lives", "must be at least 1");
        }
        if self.collection_radius <= 0.0 {
            return invalid("collection_radius", "must be positive");
        }
        if self.magnet_enabled() {
            if self.attraction_strength > 1.0 {
                return invalid("attraction_strength", "must not exceed 1");
            }
            if self.attraction_radius <= self.collection_radius {
                return invalid("attraction_radius", "must exceed the collection radius");
            }
        }
        if self.parcels_per_level == 0 {
            return invalid("parcels_per_level", "must be at least 1");
        }
        if self.obstacle_box < 0.0 {
            return invalid("obstacle_box", "must not be negative");
        }
        if self.tick_period_ms == 0 {
            return invalid("tick_period_ms", "must be positive");
        }
        Ok(())
    }

    fn in_field(&self, pos: Vec2) -> bool {
        (0.0..=self.field_width).contains(&pos.x) && (0.0..=self.field_height).contains(&pos.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(Tuning::for_ruleset(Ruleset::Magnetic).validate().is_ok());
        assert!(Tuning::for_ruleset(Ruleset::Classic).validate().is_ok());
        assert!(!Tuning::for_ruleset(Ruleset::Classic).magnet_enabled());
    }

    #[test]
    fn test_ruleset_parse() {
        assert_eq!("Classic".parse::<Ruleset>().unwrap(), Ruleset::Classic);
        assert_eq!(" magnet ".parse::<Ruleset>().unwrap(), Ruleset::Magnetic);
        assert!(matches!(
            "arcade".parse::<Ruleset>(),
            Err(ConfigError::UnknownRuleset(_))
        ));
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let tuning = Tuning::from_json(r#"{ "player_speed": 5.0, "parcel_hit": "box" }"#).unwrap();
        assert_eq!(tuning.player_speed, 5.0);
        assert_eq!(tuning.parcel_hit, HitShape::Box);
        assert_eq!(tuning.field_width, FIELD_WIDTH);
        assert_eq!(tuning.post_office, Vec2::new(350.0, 300.0));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_magnet_inside_pickup_radius() {
        let err = Tuning::from_json(r#"{ "attraction_radius": 10.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "attraction_radius",
                ..
            }
        ));
    }

    #[test]
    fn test_magnet_radius_unchecked_when_disabled() {
        let tuning = Tuning {
            attraction_radius: 0.0,
            attraction_strength: 0.0,
            ..Tuning::default()
        };
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_rejects_field_smaller_than_margin() {
        let tuning = Tuning {
            field_width: 90.0,
            ..Tuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::Invalid {
                field: "field_width",
                ..
            })
        ));
    }
}
