use colored::Colorize;
use sw_core::ContentTables;
use sw_simulation::{find_route, format_route};

/// Print the shortest route between two districts.
pub fn run(content: &ContentTables, from: &str, to: &str) -> Result<(), String> {
    super::known_district(content, from)?;
    super::known_district(content, to)?;

    let districts = content.district_map();
    let route = find_route(Some(from), to, &districts);
    println!("  {}", format_route(&route, &districts).bold());
    let hops = route.len().saturating_sub(1);
    println!("  {hops} hop{}", if hops == 1 { "" } else { "s" });
    Ok(())
}
