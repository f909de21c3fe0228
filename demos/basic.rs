//! Basic example: decaying a decoded pet descriptor
//!
//! This example demonstrates:
//! - Building a record from decoder JSON
//! - Building a resolution context
//! - Reading the per-statistic breakdown

use chrono::NaiveDate;
use petdecay::*;
use serde_json::json;

fn main() -> Result<(), DecayError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("petdecay=debug")),
        )
        .init();

    let pet = PetStatRecord::from_json(&json!({
        "type_id": 102030,
        "name": "Thunder Bird",
        "pet_grade": 109,
        "cheng_zhang": 1.236,
        "gong_ji_zz": 1720,
        "fang_yu_zz": 1580,
        "su_du_zz": 1650,
        "duo_shan_zz": 1500,
        "ti_li_zz": 6400,
        "fa_li_zz": 3300,
        "attack": 1320,
        "defence": 780,
        "speed": 560,
        "min_jie": 380,
        "max_blood": 5100,
        "blood": 5100,
        "max_magic": 2600,
        "magic": 2450,
        "ling_li": 640,
    }));

    let ctx = ResolutionContext::new()
        .with_baseline("1550|1550|1600|1500|5800|3100")
        .with_last_checked_year(2021)
        .on_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default());

    let engine = ExcessStatEngine::new(DecayTables::default())?;
    let outcome = engine.apply(&pet, &ctx);

    match outcome.report.skipped {
        Some(reason) => println!("Skipped: {}", reason),
        None => {
            println!(
                "Tier {:?}, {} year(s) elapsed",
                outcome.report.tier.map(Tier::index),
                outcome.report.elapsed_years
            );
            for stat in &outcome.report.stats {
                println!(
                    "  {}: {} -> organic {} + excess {} (decayed {})",
                    stat.total_field,
                    stat.original_total,
                    stat.organic,
                    stat.excess_after,
                    stat.decayed()
                );
                for reduction in &stat.cascade {
                    println!(
                        "      {} -{} => {}",
                        reduction.field, reduction.decay, reduction.value_after
                    );
                }
            }
        }
    }

    Ok(())
}
