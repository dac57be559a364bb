use comfy_table::{ContentArrangement, Table};
use sw_core::{ContentTables, NpcState};
use sw_mechanics::parse_seed;
use sw_narrative::closest_match;
use sw_simulation::{NpcGenOptions, generate_npc_batch_seeded};

use crate::Format;

/// Roll NPCs and print them as a table or JSON.
pub fn run(
    content: &ContentTables,
    count: usize,
    template: Option<&str>,
    district: Option<&str>,
    seed: Option<&str>,
    uniques: Option<f64>,
    format: Format,
) -> Result<(), String> {
    let mut opts = NpcGenOptions::default();
    if let Some(seed) = seed {
        opts = opts.with_seed(parse_seed(seed));
    }
    if let Some(template) = template {
        known_template(content, template)?;
        opts = opts.with_templates(&[template]);
    }
    if let Some(district) = district {
        super::known_district(content, district)?;
        opts = opts.in_district(district);
    }
    if let Some(chance) = uniques {
        opts = opts.with_uniques(chance.clamp(0.0, 1.0));
    }

    let npcs = generate_npc_batch_seeded(content, count, &opts).map_err(|e| e.to_string())?;

    if format == Format::Json {
        let json = serde_json::to_string_pretty(&npcs).map_err(|e| format!("JSON serialization error: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Kind", "Age", "District", "Best stat", "Affiliations"]);
    for npc in &npcs {
        table.add_row(vec![
            npc.name.clone(),
            kind_label(content, npc),
            (npc.age_months / 12).to_string(),
            npc.district.clone().unwrap_or_else(|| "-".to_string()),
            best_stat(npc),
            affiliations(content, npc),
        ]);
    }
    println!("{table}");
    println!();
    println!("  {} NPCs", npcs.len());
    Ok(())
}

fn known_template(content: &ContentTables, id: &str) -> Result<(), String> {
    if content.npc_template(id).is_some() {
        return Ok(());
    }
    let ids = content.npc_templates.iter().map(|t| t.id.as_str());
    match closest_match(id, ids) {
        Some(suggestion) => Err(format!("unknown NPC template \"{id}\" (did you mean \"{suggestion}\"?)")),
        None => Err(format!("unknown NPC template \"{id}\"")),
    }
}

fn kind_label(content: &ContentTables, npc: &NpcState) -> String {
    match npc.template_id() {
        Some(id) => content
            .npc_template(id)
            .map_or(id.to_string(), |t| t.label.clone()),
        None => "unique".to_string(),
    }
}

fn best_stat(npc: &NpcState) -> String {
    npc.skills
        .main
        .iter()
        .max_by_key(|(_, level)| **level)
        .map_or("-".to_string(), |(stat, level)| format!("{stat} {level}"))
}

fn affiliations(content: &ContentTables, npc: &NpcState) -> String {
    if npc.affiliations.is_empty() {
        return "-".to_string();
    }
    npc.affiliations
        .iter()
        .map(|a| content.affiliation_name(a))
        .collect::<Vec<_>>()
        .join(", ")
}
