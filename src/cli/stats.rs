//! Stats command implementation

use anyhow::{Result, anyhow};

use ritual::config::Config;
use ritual::domain::Category;
use ritual::progress::today;

use super::open_manager;

/// Show lifetime XP per category and a trailing daily window
pub fn stats_command(config: &Config, category: Option<String>, days: u32) -> Result<()> {
    let day = today();
    let manager = open_manager(config)?;
    let query = manager.query();

    let streak = query.global_streak(&config.user, day)?;
    println!("Global streak: {}", streak.displayed);

    let categories: Vec<Category> = match category {
        Some(raw) => {
            let cat = Category::from_str(&raw)
                .ok_or_else(|| anyhow!("Unknown category: {raw}"))?;
            vec![cat]
        }
        None => Category::ALL.to_vec(),
    };

    let totals = query.category_totals(&config.user)?;
    println!("\nLifetime XP:");
    for total in totals.iter().filter(|t| categories.contains(&t.category)) {
        println!("  {:<8} {}", total.category.label(), total.lifetime_xp);
    }

    for cat in &categories {
        let window = query.xp_window(&config.user, *cat, days, day)?;
        if window.iter().all(|d| d.due == 0) {
            continue;
        }
        println!("\n{} - last {} days:", cat.label(), days);
        for entry in window {
            println!(
                "  {}  {:>3} xp  ({}/{} done)",
                entry.day, entry.xp, entry.completed, entry.due
            );
        }
    }
    Ok(())
}
