use comfy_table::{Table, presets::UTF8_FULL};
use nearby_core::near::near_summary::NearSummary;

pub fn summary_table(summary: &NearSummary) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Targets",
        "Candidates",
        "Matched",
        "Unmatched",
        "Max distance",
        "Strategy",
    ]);

    table.add_row(vec![
        summary.targets.to_string(),
        summary.candidates.to_string(),
        summary.matched.to_string(),
        summary.unmatched.to_string(),
        summary
            .max_distance
            .map(|distance| format!("{distance:.3}"))
            .unwrap_or_else(|| String::from("-")),
        summary.strategy.to_string(),
    ]);

    table
}
