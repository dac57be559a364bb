//! Configuration for a game session.

use sw_simulation::{Calendar, GenConfig};

/// Configuration for a game session.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// RNG seed for reproducible runs. `None` plays with OS entropy.
    pub seed: Option<u32>,
    /// The player's name.
    pub player_name: String,
    /// District the player starts in.
    pub start_district: String,
    /// Money the player starts with.
    pub start_money: i64,
    /// Main stat level and subskill percent the player starts with.
    pub start_skills: (i32, i32),
    /// Maps turns to calendar months.
    pub calendar: Calendar,
    /// Generator knobs.
    pub generators: GenConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            player_name: "Rook".to_string(),
            start_district: "midlands".to_string(),
            start_money: 200,
            start_skills: (3, 20),
            calendar: Calendar::default(),
            generators: GenConfig::default(),
        }
    }
}

impl GameConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the player's name.
    pub fn with_player_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = name.into();
        self
    }

    /// Set the starting district.
    pub fn with_start_district(mut self, district: impl Into<String>) -> Self {
        self.start_district = district.into();
        self
    }

    /// Set starting money.
    pub fn with_start_money(mut self, money: i64) -> Self {
        self.start_money = money;
        self
    }

    /// Set starting skills (main stats clamped to 0-10, subskills to 0-100).
    pub fn with_start_skills(mut self, main: i32, sub: i32) -> Self {
        self.start_skills = (main.clamp(0, 10), sub.clamp(0, 100));
        self
    }

    /// Set the calendar.
    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Set the generator knobs.
    pub fn with_generators(mut self, generators: GenConfig) -> Self {
        self.generators = generators;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.start_district, "midlands");
        assert_eq!(cfg.generators, GenConfig::default());
    }

    #[test]
    fn builder_methods() {
        let cfg = GameConfig::default()
            .with_seed(123)
            .with_player_name("Vee")
            .with_start_district("harbor")
            .with_start_money(-40);
        assert_eq!(cfg.seed, Some(123));
        assert_eq!(cfg.player_name, "Vee");
        assert_eq!(cfg.start_district, "harbor");
        assert_eq!(cfg.start_money, -40);
    }

    #[test]
    fn skills_clamped() {
        let cfg = GameConfig::default().with_start_skills(40, -5);
        assert_eq!(cfg.start_skills, (10, 0));
    }
}
