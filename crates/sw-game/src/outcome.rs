//! Landing outcome tiers and their effects on the game state.

use rand::RngCore;
use sw_core::relationship::membership_id;
use sw_core::{ContentTables, Effect, GameState, OutcomeTier, StatsDelta};
use sw_mechanics::pick;

/// Reputation stays within this range.
pub const REPUTATION_RANGE: (i32, i32) = (-100, 100);

/// Apply a list of effects to the player and world. Returns the summed
/// vitals change for the log.
pub fn apply_effects(state: &mut GameState, effects: &[Effect]) -> StatsDelta {
    let mut total = StatsDelta::default();
    for effect in effects {
        match effect {
            Effect::Stats { delta } => {
                state.player.vitals.apply(delta);
                total = total.merge(delta);
            }
            Effect::Skills { deltas } => state.player.skills.apply(deltas),
            Effect::AddWorldTag { tag } => {
                state.world_tags.insert(tag.clone());
            }
            Effect::RemoveWorldTag { tag } => {
                state.world_tags.remove(tag);
            }
            Effect::AddPlayerTag { tag } => {
                state.player.tags.insert(tag.clone());
            }
            Effect::Reputation {
                affiliation_id,
                delta,
            } => {
                let id = membership_id(affiliation_id, &state.player.id);
                match state.memberships.get_mut(&id) {
                    Some(row) => {
                        let (lo, hi) = REPUTATION_RANGE;
                        row.reputation = row.reputation.saturating_add(*delta).clamp(lo, hi);
                    }
                    None => tracing::debug!(affiliation = %affiliation_id, "reputation change for a non-member"),
                }
            }
            Effect::Relationship { npc_id, delta } => {
                let player_id = state.player.id.clone();
                match state.relationship_between_mut(&player_id, npc_id) {
                    Some(rel) => rel.strength = rel.strength.saturating_add(*delta).clamp(0, 100),
                    None => tracing::debug!(npc = %npc_id, "relationship change with a stranger"),
                }
            }
        }
    }
    total
}

/// Look up `tier` (graph override first), apply its effects, and log one of
/// its flavor lines. Missing definitions are a no-op.
pub fn apply_outcome<R: RngCore + ?Sized>(
    state: &mut GameState,
    content: &ContentTables,
    tier: OutcomeTier,
    graph_id: Option<&str>,
    rng: &mut R,
) {
    let Some(definition) = content.outcome(tier, graph_id) else {
        tracing::warn!(%tier, ?graph_id, "no outcome definition");
        return;
    };
    let delta = apply_effects(state, &definition.effects);
    let text = pick(rng, &definition.flavor)
        .cloned()
        .unwrap_or_else(|| format!("Outcome: {tier}."));
    state.push_log(text, (!delta.is_empty()).then_some(delta));
}

#[cfg(test)]
mod tests {
    use sw_core::{Membership, Relationship, SkillDeltas, SubSkill};
    use sw_mechanics::FixedRng;

    use super::*;

    #[test]
    fn stats_and_tags() {
        let mut state = GameState::default();
        let total = apply_effects(
            &mut state,
            &[
                Effect::Stats {
                    delta: StatsDelta {
                        health: -20,
                        ..StatsDelta::money(30)
                    },
                },
                Effect::Stats {
                    delta: StatsDelta::money(5),
                },
                Effect::AddWorldTag { tag: "curfew".into() },
                Effect::AddPlayerTag { tag: "marked".into() },
            ],
        );
        assert_eq!(state.player.vitals.health, 80);
        assert_eq!(state.player.vitals.money, 35);
        assert_eq!(total.money, 35);
        assert!(state.world_tags.contains("curfew"));
        assert!(state.player.tags.contains("marked"));

        apply_effects(&mut state, &[Effect::RemoveWorldTag { tag: "curfew".into() }]);
        assert!(state.world_tags.is_empty());
    }

    #[test]
    fn skills_are_capped() {
        let mut state = GameState::default();
        let deltas = SkillDeltas {
            sub_skills: [(SubSkill::Stealth, 250)].into_iter().collect(),
            ..SkillDeltas::default()
        };
        apply_effects(&mut state, &[Effect::Skills { deltas }]);
        assert_eq!(state.player.skills.sub(SubSkill::Stealth), 100);
    }

    #[test]
    fn reputation_only_for_members() {
        let mut state = GameState::default();
        let row = Membership::new("night_market", "player", 90);
        state.memberships.insert(row.id.clone(), row);
        apply_effects(
            &mut state,
            &[
                Effect::Reputation {
                    affiliation_id: "night_market".into(),
                    delta: 25,
                },
                Effect::Reputation {
                    affiliation_id: "city_watch".into(),
                    delta: 25,
                },
            ],
        );
        assert_eq!(state.memberships["night_market__player"].reputation, 100);
        assert_eq!(state.memberships.len(), 1);
    }

    #[test]
    fn relationship_strength_moves_either_direction() {
        let mut state = GameState::default();
        let rel = Relationship::new("npc-1", "player", 95);
        state.relationships.insert(rel.id.clone(), rel);
        apply_effects(
            &mut state,
            &[Effect::Relationship {
                npc_id: "npc-1".into(),
                delta: 10,
            }],
        );
        assert_eq!(state.relationship_between("player", "npc-1").unwrap().strength, 100);
    }

    #[test]
    fn huge_effect_deltas_saturate() {
        let mut state = GameState::default();
        let row = Membership::new("night_market", "player", 10);
        state.memberships.insert(row.id.clone(), row);
        let rel = Relationship::new("npc-1", "player", 50);
        state.relationships.insert(rel.id.clone(), rel);
        apply_effects(
            &mut state,
            &[
                Effect::Reputation {
                    affiliation_id: "night_market".into(),
                    delta: i32::MAX,
                },
                Effect::Relationship {
                    npc_id: "npc-1".into(),
                    delta: i32::MIN,
                },
                Effect::Stats {
                    delta: StatsDelta {
                        health: i32::MIN,
                        ..StatsDelta::default()
                    },
                },
            ],
        );
        assert_eq!(state.memberships["night_market__player"].reputation, 100);
        assert_eq!(state.relationship_between("player", "npc-1").unwrap().strength, 0);
        assert_eq!(state.player.vitals.health, 0);
    }

    #[test]
    fn outcome_logs_flavor_with_deltas() {
        let content = ContentTables::builtin();
        let mut state = GameState::default();
        apply_outcome(&mut state, &content, OutcomeTier::Failure, None, &mut FixedRng(0.0));
        assert_eq!(state.player.vitals.health, 95);
        assert_eq!(state.player.vitals.stress, 10);
        let entry = state.log.last().unwrap();
        assert_eq!(entry.text, "It slips away from you.");
        assert_eq!(entry.deltas.as_ref().map(|d| d.health), Some(-5));
    }

    #[test]
    fn graph_override_wins() {
        let content = ContentTables::builtin();
        let mut state = GameState::default();
        apply_outcome(
            &mut state,
            &content,
            OutcomeTier::Success,
            Some("lost_courier_package"),
            &mut FixedRng(0.0),
        );
        assert_eq!(state.player.vitals.money, 120);
        assert!(state.player.tags.contains("reliable"));
    }
}
