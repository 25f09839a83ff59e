//! Plain-text rendering of a portfolio summary.

use caslens_core::PortfolioSummary;
use std::fmt::Write;

pub fn render_text(summary: &PortfolioSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Found {} funds\n", summary.funds.len());

    for f in &summary.funds {
        let date = f
            .valued_on
            .map(|d| format!(" (as of {d})"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "- [{:<7}] {:>16} | {}{}",
            f.plan_type.label(),
            format!("{:.2}", f.value),
            f.name,
            date
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Total value:        {:.2}", summary.total_value);
    let _ = writeln!(
        out,
        "Direct plans:       {:.2} ({:.1}%)",
        summary.direct_value,
        summary.direct_share() * 100.0
    );
    let _ = writeln!(out, "Regular plans:      {:.2}", summary.regular_value);
    let unknown = summary.unknown_value();
    if unknown > 0.0 {
        let _ = writeln!(
            out,
            "Unclassified:       {:.2} ({} unnamed)",
            unknown,
            summary.placeholder_count()
        );
    }
    let _ = writeln!(
        out,
        "Potential savings:  {:.2} per year by switching regular plans to direct",
        summary.potential_savings
    );
    out
}
