//! Behavior configuration.
//!
//! The default-behavior pass (`rules::apply_default_behaviors`) turns coarse
//! archetype tags into concrete behavior graphs by expanding DSL templates.
//! The numbers those templates use — attack cadence, hazard damage, the
//! designer-tag range — are configuration, not code, so games can retune
//! them without touching the expansion pass.

use serde::{Deserialize, Serialize};

/// Tunables for default-behavior template expansion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Base attack interval in seconds before the speed stat is applied.
    pub attack_interval_base: f64,

    /// Speed stat points per second of interval reduction.
    pub attack_speed_divisor: f64,

    /// Seconds of wind-up between an attack and its cooldown wait.
    pub attack_windup: f64,

    /// Health lost per touch of a kind-1 liquid (water-like hazard).
    pub liquid_damage_mild: i32,

    /// Health lost per touch of a kind-2 liquid (lava-like hazard).
    pub liquid_damage_harsh: i32,

    /// Health lost per step on a hazard wall.
    pub hazard_wall_damage: i32,

    /// Seconds between repeated hazard damage ticks.
    pub hazard_cooldown: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            attack_interval_base: 3.0,
            attack_speed_divisor: 50.0,
            attack_windup: 0.5,
            liquid_damage_mild: 5,
            liquid_damage_harsh: 25,
            hazard_wall_damage: 5,
            hazard_cooldown: 1.0,
        }
    }
}

impl BehaviorConfig {
    /// Create the standard configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attack interval in seconds for an item with the given speed stat:
    /// `max(0, round10(base - speed / divisor))`, where `round10` floors to
    /// one decimal place.
    #[must_use]
    pub fn attack_interval(&self, speed: i32) -> f64 {
        let interval = self.attack_interval_base - f64::from(speed) / self.attack_speed_divisor;
        round10(interval).max(0.0)
    }
}

/// Floor to one decimal place, matching the editor's interval display.
#[must_use]
pub fn round10(value: f64) -> f64 {
    (value * 10.0).floor() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_interval() {
        let config = BehaviorConfig::new();

        assert_eq!(config.attack_interval(0), 3.0);
        assert_eq!(config.attack_interval(20), 2.6);
        assert_eq!(config.attack_interval(50), 2.0);
        // Fast enough items bottom out at zero.
        assert_eq!(config.attack_interval(1000), 0.0);
    }

    #[test]
    fn test_round10() {
        assert_eq!(round10(2.64), 2.6);
        assert_eq!(round10(2.0), 2.0);
        assert_eq!(round10(0.55), 0.5);
    }
}
