/// Knobs for the procedural generators.
#[derive(Debug, Clone, PartialEq)]
pub struct GenConfig {
    /// Most postings a generation pass returns.
    pub max_listings: usize,
    /// Salary jitter as a fraction of base salary, applied in both directions.
    pub salary_jitter: f64,
    /// Chance an encounter fires on each hop of a journey.
    pub encounter_chance: f64,
    /// Inclusive range of errands and events added each month.
    pub monthly_events: (u32, u32),
    /// NPCs rolled into a fresh game.
    pub initial_npcs: usize,
    /// Chance a batch slot is filled by a hand-authored profile.
    pub unique_chance: f64,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            max_listings: 5,
            salary_jitter: 0.2,
            encounter_chance: 0.5,
            monthly_events: (1, 2),
            initial_npcs: 6,
            unique_chance: 0.1,
        }
    }
}

impl GenConfig {
    /// Set the posting cap.
    pub fn with_max_listings(mut self, max: usize) -> Self {
        self.max_listings = max;
        self
    }

    /// Set the salary jitter fraction.
    pub fn with_salary_jitter(mut self, jitter: f64) -> Self {
        self.salary_jitter = jitter;
        self
    }

    /// Set the per-hop encounter chance (0.0 disables encounters).
    pub fn with_encounter_chance(mut self, chance: f64) -> Self {
        self.encounter_chance = chance;
        self
    }

    /// Set how many errands and events each month brings.
    pub fn with_monthly_events(mut self, min: u32, max: u32) -> Self {
        self.monthly_events = (min.min(max), min.max(max));
        self
    }

    /// Set the number of NPCs in a fresh game.
    pub fn with_initial_npcs(mut self, n: usize) -> Self {
        self.initial_npcs = n;
        self
    }

    /// Set the unique-profile substitution chance.
    pub fn with_unique_chance(mut self, chance: f64) -> Self {
        self.unique_chance = chance;
        self
    }
}
