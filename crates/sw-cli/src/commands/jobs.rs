use comfy_table::{ContentArrangement, Table};
use sw_core::ContentTables;
use sw_mechanics::{make_rng, parse_seed};
use sw_simulation::{JobGenOptions, generate_job_instances};

use crate::Format;

/// Print a freshly rolled job board.
pub fn run(
    content: &ContentTables,
    month: u32,
    max: usize,
    seed: Option<&str>,
    format: Format,
) -> Result<(), String> {
    let opts = JobGenOptions::default().with_max_listings(max).for_month(month);
    let mut rng = make_rng(seed.map(parse_seed));
    let postings = generate_job_instances(content, &content.job_ids(), &opts, &mut rng);

    if format == Format::Json {
        let json = serde_json::to_string_pretty(&postings).map_err(|e| format!("JSON serialization error: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    if postings.is_empty() {
        println!("  No postings.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Posting", "Title", "Employer", "Salary"]);
    for posting in &postings {
        let employer = posting
            .affiliation_id
            .as_deref()
            .map_or("independent", |a| content.affiliation_name(a));
        table.add_row(vec![
            posting.id.clone(),
            posting.title.clone(),
            employer.to_string(),
            format!("${}", posting.salary),
        ]);
    }
    println!("{table}");
    println!();
    println!("  {} postings", postings.len());
    Ok(())
}
