//! Console report for the ranked views

use crate::analytics_core::{AnalysisResult, CampaignMetrics, RankingView};
use std::fmt::Write;

const RULE_WIDTH: usize = 80;

/// Render both views as fixed-width text tables
pub fn render_report(result: &AnalysisResult, top_n: usize) -> String {
    let mut out = String::new();

    for view in RankingView::all() {
        render_view(&mut out, view, result.view(view), top_n);
    }
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');

    out
}

fn render_view(out: &mut String, view: RankingView, rows: &[CampaignMetrics], top_n: usize) {
    let heavy = "=".repeat(RULE_WIDTH);

    // Writing to a String cannot fail
    let _ = writeln!(out, "\n{}", heavy);
    let _ = writeln!(out, "TOP {} CAMPAIGNS BY {}", top_n, view.title());
    let _ = writeln!(out, "{}", heavy);
    let _ = writeln!(
        out,
        "{:<15} {:>15} {:>12} {:>15} {:>15} {:>10} {:>10}",
        "Campaign ID", "Impressions", "Clicks", "Spend", "Conversions", "CTR", "CPA"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    if rows.is_empty() {
        let _ = writeln!(out, "(no eligible campaigns)");
    }

    for row in rows {
        let _ = writeln!(out, "{}", format_line(row));
    }
}

fn format_line(m: &CampaignMetrics) -> String {
    format!(
        "{:<15} {:>15} {:>12} ${:>14.2} {:>15} {:>9.4}% {:>10}",
        m.campaign_id,
        m.total_impressions,
        m.total_clicks,
        m.total_spend,
        m.total_conversions,
        m.ctr * 100.0,
        m.cpa_display()
    )
}
