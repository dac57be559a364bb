//! The tables Streetwise ships with.

use std::collections::BTreeMap;

use crate::district::DistrictState;
use crate::graph::{TaskChoice, TaskGraph, TaskNode};
use crate::outcome::{Effect, OutcomeDefinition, OutcomeTier};
use crate::relationship::NO_AFFILIATION;
use crate::stats::{MainStat, Skills, StatRef, StatsDelta, SubSkill, Vitals};
use crate::task::TaskKind;

use super::types::{
    Affiliation, Career, EventTemplate, JobTemplate, NpcTemplate, UniqueProfile, VitalRanges,
};
use super::ContentTables;

pub(super) fn tables() -> ContentTables {
    ContentTables {
        careers: careers(),
        affiliations: affiliations(),
        districts: districts(),
        npc_templates: npc_templates(),
        unique_profiles: unique_profiles(),
        events: events(),
        headlines: headlines(),
        outcomes: outcomes(),
        graphs: graphs()
            .into_iter()
            .map(|g| (g.id.clone(), g))
            .collect(),
    }
}

fn districts() -> Vec<DistrictState> {
    vec![
        DistrictState::new("downtown", "Downtown")
            .with_scalars(70, 35, 80)
            .with_tags(&["corporate", "crowded", "patrolled"])
            .with_adjacent(&["midlands", "heights"]),
        DistrictState::new("midlands", "The Midlands")
            .with_scalars(50, 45, 50)
            .with_tags(&["residential", "crowded"])
            .with_adjacent(&["downtown", "industrial"]),
        DistrictState::new("industrial", "Industrial Belt")
            .with_scalars(35, 60, 40)
            .with_tags(&["factory", "gritty"])
            .with_adjacent(&["midlands", "harbor"]),
        DistrictState::new("harbor", "Harbor")
            .with_scalars(25, 70, 35)
            .with_tags(&["port", "gritty", "smuggling"])
            .with_adjacent(&["industrial"]),
        DistrictState::new("heights", "The Heights")
            .with_scalars(90, 10, 95)
            .with_tags(&["wealthy", "patrolled"])
            .with_adjacent(&["downtown"]),
    ]
}

fn affiliations() -> Vec<Affiliation> {
    vec![
        Affiliation::new(NO_AFFILIATION, "Independent", &[]),
        Affiliation::new("helix_corp", "Helix Corporation", &["corporate"]),
        Affiliation::new("iron_union", "Iron Union", &["labor", "factory"]),
        Affiliation::new("night_market", "Night Market Collective", &["trade", "smuggling"]),
        Affiliation::new("city_watch", "City Watch", &["law", "patrolled"]),
        Affiliation::new("red_lantern", "Red Lantern Syndicate", &["gang", "smuggling"]),
    ]
}

fn careers() -> Vec<Career> {
    vec![
        Career {
            id: "corporate".into(),
            name: "Corporate".into(),
            affiliation_ids: vec!["helix_corp".into()],
            jobs: vec![
                JobTemplate::new("clerk", "Clerk", 900)
                    .with_tags(&["office"])
                    .with_description("Files, forms and fluorescent light."),
                JobTemplate::new("analyst", "Analyst", 1600)
                    .with_tags(&["office", "skilled"])
                    .with_description("Turns numbers into slides for people who skip them."),
            ],
        },
        Career {
            id: "security".into(),
            name: "Security".into(),
            affiliation_ids: vec!["city_watch".into(), "helix_corp".into()],
            jobs: vec![
                JobTemplate::new("patrol_officer", "Patrol Officer", 1200)
                    .with_tags(&["law", "dangerous"])
                    .with_description("Walk the beat and try to come home."),
                JobTemplate::new("bodyguard", "Bodyguard", 1800)
                    .with_tags(&["dangerous", "skilled"])
                    .with_description("Stand between money and trouble."),
            ],
        },
        Career {
            id: "trade".into(),
            name: "Trade".into(),
            affiliation_ids: vec!["night_market".into()],
            jobs: vec![
                JobTemplate::new("courier", "Courier", 700)
                    .with_tags(&["street", "driving"])
                    .with_description("Packages in, questions out."),
                JobTemplate::new("street_vendor", "Street Vendor", 600)
                    .with_tags(&["street"])
                    .with_description("Noodles, knock-offs and gossip."),
            ],
        },
        Career {
            id: "industrial".into(),
            name: "Industrial".into(),
            affiliation_ids: vec!["iron_union".into()],
            jobs: vec![
                JobTemplate::new("dock_worker", "Dock Worker", 800)
                    .with_tags(&["manual", "port"])
                    .with_description("Containers do not unload themselves."),
                JobTemplate::new("machinist", "Machinist", 1100)
                    .with_tags(&["manual", "skilled"])
                    .with_description("Keeps the presses running."),
            ],
        },
        Career {
            id: "gang".into(),
            name: "Gang".into(),
            affiliation_ids: vec!["red_lantern".into()],
            jobs: vec![
                JobTemplate::new("enforcer", "Enforcer", 1400)
                    .with_tags(&["illegal", "dangerous"])
                    .with_description("Collect what is owed."),
            ],
        },
        Career {
            id: "freelance".into(),
            name: "Freelance".into(),
            affiliation_ids: Vec::new(),
            jobs: vec![
                JobTemplate::new("odd_jobber", "Odd Jobber", 400)
                    .with_tags(&["street"])
                    .with_description("Whatever pays this week."),
            ],
        },
    ]
}

fn npc_templates() -> Vec<NpcTemplate> {
    vec![
        NpcTemplate::new("street_tough", "Street tough")
            .with_weight(MainStat::Physique, 2.0, 3.0)
            .with_weight(MainStat::Reflexes, 1.0, 2.0)
            .with_weight(MainStat::Intellect, 0.3, 0.8)
            .with_weight(MainStat::Charisma, 0.5, 1.2)
            .with_jitter(SubSkill::Brawling, 0.0, 30.0)
            .with_names(&["Knuckles", "Rook", "Dee", "Brick", "Sal", "Mako"])
            .with_avatars(&["tough_1", "tough_2"])
            .with_ages(17, 40)
            .with_districts(&["industrial", "harbor"])
            .with_tags(&["violent", "loyal", "broke", "jumpy"])
            .with_affiliations(&["red_lantern", NO_AFFILIATION]),
        NpcTemplate::new("netrunner", "Netrunner")
            .with_weight(MainStat::Physique, 0.2, 0.6)
            .with_weight(MainStat::Reflexes, 1.0, 1.5)
            .with_weight(MainStat::Intellect, 2.5, 3.5)
            .with_weight(MainStat::Charisma, 0.4, 1.0)
            .with_jitter(SubSkill::Hacking, 5.0, 35.0)
            .with_names(&["Glitch", "Ada", "Nines", "Pixel", "Sable"])
            .with_avatars(&["runner_1", "runner_2"])
            .with_ages(16, 35)
            .with_districts(&["midlands", "downtown"])
            .with_tags(&["paranoid", "curious", "night_owl"])
            .with_affiliations(&["night_market", NO_AFFILIATION]),
        NpcTemplate::new("fixer", "Fixer")
            .with_weight(MainStat::Physique, 0.5, 1.0)
            .with_weight(MainStat::Reflexes, 0.8, 1.2)
            .with_weight(MainStat::Intellect, 1.0, 1.8)
            .with_weight(MainStat::Charisma, 2.5, 3.0)
            .with_names(&["Mister Lu", "Vera", "Cato", "Honey", "Silas"])
            .with_avatars(&["fixer_1"])
            .with_ages(28, 60)
            .with_districts(&["harbor", "downtown", "midlands"])
            .with_tags(&["connected", "greedy", "discreet"])
            .with_affiliations(&["night_market", "red_lantern"])
            .with_vitals(VitalRanges {
                money: (800, 3000),
                ..VitalRanges::default()
            }),
        NpcTemplate::new("corp_drone", "Corporate drone")
            .with_weight(MainStat::Physique, 0.5, 1.0)
            .with_weight(MainStat::Reflexes, 0.5, 1.0)
            .with_weight(MainStat::Intellect, 1.5, 2.5)
            .with_weight(MainStat::Charisma, 1.2, 2.0)
            .with_names(&["Jensen", "Park", "Okafor", "Lindqvist", "Moreau"])
            .with_avatars(&["suit_1", "suit_2"])
            .with_ages(24, 55)
            .with_districts(&["downtown", "heights"])
            .with_tags(&["ambitious", "tired", "loyal"])
            .with_affiliations(&["helix_corp"])
            .with_vitals(VitalRanges {
                stress: (30, 70),
                money: (500, 2000),
                ..VitalRanges::default()
            }),
    ]
}

fn unique_profiles() -> Vec<UniqueProfile> {
    let mut rosa = Skills::uniform(3, 20);
    rosa.main.insert(MainStat::Charisma, 8);
    rosa.sub.insert(SubSkill::Streetwise, 75);
    rosa.sub.insert(SubSkill::Persuasion, 60);

    let mut kane = Skills::uniform(4, 30);
    kane.main.insert(MainStat::Reflexes, 7);
    kane.sub.insert(SubSkill::Firearms, 65);
    kane.sub.insert(SubSkill::Streetwise, 50);

    vec![
        UniqueProfile {
            id: "mama_rosa".into(),
            name: "Mama Rosa".into(),
            avatar: Some("rosa".into()),
            age_years: 58,
            vitals: Vitals {
                money: 4000,
                ..Vitals::default()
            },
            skills: rosa,
            district: Some("harbor".into()),
            tags: ["matriarch".to_string(), "connected".to_string()].into(),
            affiliations: vec!["night_market".into()],
        },
        UniqueProfile {
            id: "detective_kane".into(),
            name: "Detective Kane".into(),
            avatar: Some("kane".into()),
            age_years: 44,
            vitals: Vitals {
                stress: 60,
                money: 900,
                ..Vitals::default()
            },
            skills: kane,
            district: Some("downtown".into()),
            tags: ["cynical".to_string(), "honest".to_string()].into(),
            affiliations: vec!["city_watch".into()],
        },
    ]
}

fn events() -> Vec<EventTemplate> {
    vec![
        EventTemplate::new("alley_mugging", "Mugging in an alley", TaskKind::RandomEvent)
            .with_weight(2.0)
            .in_districts(&["gritty"])
            .with_context(&["danger"])
            .with_graph("alley_mugging"),
        EventTemplate::new("checkpoint", "Watch checkpoint", TaskKind::RandomEvent)
            .in_districts(&["patrolled"])
            .with_context(&["law"])
            .with_graph("checkpoint_shakedown"),
        EventTemplate::new("street_preacher", "A street preacher", TaskKind::RandomEvent)
            .with_weight(0.5)
            .with_context(&["flavor"]),
        EventTemplate::new("pickpocket", "Pickpocket in the crowd", TaskKind::RandomEvent)
            .in_districts(&["crowded"])
            .with_context(&["danger"])
            .with_graph("alley_mugging"),
        EventTemplate::new("lost_package", "A package gone astray", TaskKind::Errand)
            .in_districts(&["port", "crowded"])
            .with_context(&["delivery"])
            .with_graph("lost_courier_package"),
        EventTemplate::new("noodle_run", "Noodle run for the neighbours", TaskKind::Errand)
            .in_districts(&["residential"])
            .with_context(&["favor"]),
        EventTemplate::new("overtime", "Unpaid overtime", TaskKind::Errand)
            .in_districts(&["corporate", "factory"])
            .with_context(&["work"]),
    ]
}

fn headlines() -> Vec<String> {
    [
        "Helix Corporation posts record profits; layoffs expected.",
        "Harbor fog delays container traffic for a third day.",
        "City Watch announces a crackdown on unlicensed vendors.",
        "Iron Union threatens strike over automation.",
        "Blackout rolls across the Midlands after a substation fire.",
        "Night Market opens a new row under the old overpass.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn outcomes() -> BTreeMap<OutcomeTier, OutcomeDefinition> {
    BTreeMap::from([
        (
            OutcomeTier::GreatSuccess,
            OutcomeDefinition::new()
                .with_effect(Effect::Stats {
                    delta: StatsDelta {
                        money: 150,
                        stress: -5,
                        ..StatsDelta::default()
                    },
                })
                .with_flavor("Everything lines up. You walk away richer and lighter.")
                .with_flavor("It goes better than you dared hope."),
        ),
        (
            OutcomeTier::Success,
            OutcomeDefinition::new()
                .with_effect(Effect::Stats {
                    delta: StatsDelta::money(60),
                })
                .with_flavor("You handle it. Not pretty, but done.")
                .with_flavor("A small win. You'll take it."),
        ),
        (
            OutcomeTier::Failure,
            OutcomeDefinition::new()
                .with_effect(Effect::Stats {
                    delta: StatsDelta {
                        health: -5,
                        stress: 10,
                        ..StatsDelta::default()
                    },
                })
                .with_flavor("It slips away from you.")
                .with_flavor("Not your night."),
        ),
        (
            OutcomeTier::GreatFailure,
            OutcomeDefinition::new()
                .with_effect(Effect::Stats {
                    delta: StatsDelta {
                        health: -15,
                        stress: 15,
                        money: -50,
                        ..StatsDelta::default()
                    },
                })
                .with_flavor("It all goes wrong at once.")
                .with_flavor("You'll be feeling this one for a while."),
        ),
    ])
}

fn graphs() -> Vec<TaskGraph> {
    vec![
        TaskGraph::new("alley_mugging", "Mugging", "start")
            .with_node(
                TaskNode::new(
                    "start",
                    "Two figures step out of the shadows. One flashes a blade.",
                )
                .with_choice(
                    TaskChoice::new("fight", "Put up your fists")
                        .check(StatRef::Sub(SubSkill::Brawling), 14),
                )
                .with_choice(TaskChoice::new("talk", "Try to talk your way out").goto("talk"))
                .with_choice(
                    TaskChoice::new("pay", "Hand over your wallet").outcome(OutcomeTier::Failure),
                ),
            )
            .with_node(
                TaskNode::new("talk", "The one with the knife tilts their head. \"Go on then.\"")
                    .with_choice(
                        TaskChoice::new("bluff", "Claim Red Lantern protection")
                            .check(StatRef::Sub(SubSkill::Deception), 13),
                    )
                    .with_choice(
                        TaskChoice::new("run", "Bolt for the main road")
                            .check(StatRef::Sub(SubSkill::Athletics), 12),
                    ),
            ),
        TaskGraph::new("lost_courier_package", "The Lost Package", "start")
            .with_node(
                TaskNode::new(
                    "start",
                    "A crushed parcel lies in the gutter, the courier's tag still legible.",
                )
                .with_choice(
                    TaskChoice::new("deliver", "Deliver it yourself").goto("deliver"),
                )
                .with_choice(
                    TaskChoice::new("open", "Open it").outcome(OutcomeTier::GreatFailure),
                )
                .with_choice(TaskChoice::new("leave", "Leave it").outcome(OutcomeTier::Failure)),
            )
            .with_node(
                TaskNode::new("deliver", "The address is across a busy junction.").with_choice(
                    TaskChoice::new("navigate", "Find the quickest way")
                        .check(StatRef::Sub(SubSkill::Streetwise), 11),
                ),
            )
            .with_override(
                OutcomeTier::Success,
                OutcomeDefinition::new()
                    .with_effect(Effect::Stats {
                        delta: StatsDelta::money(120),
                    })
                    .with_effect(Effect::AddPlayerTag {
                        tag: "reliable".into(),
                    })
                    .with_flavor("The recipient tips generously and remembers your face."),
            ),
        TaskGraph::new("checkpoint_shakedown", "Checkpoint", "start").with_node(
            TaskNode::new("start", "A Watch officer waves you over and holds out a hand for ID.")
                .with_choice(TaskChoice::new("comply", "Show your ID").outcome(OutcomeTier::Success))
                .with_choice(
                    TaskChoice::new("charm", "Make small talk")
                        .check(StatRef::Main(MainStat::Charisma), 12),
                )
                .with_choice(
                    TaskChoice::new("slip", "Slip into the crowd")
                        .check(StatRef::Sub(SubSkill::Stealth), 15),
                ),
        ),
    ]
}
