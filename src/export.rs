//! Markdown export of an analysis result.
//!
//! Pure formatting: the same result and timestamp always produce
//! byte-identical output. Topics are listed by confidence descending;
//! low-effort/high-reward topics get a star marker.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::analysis::AnalysisResult;

/// Marker prepended to quick-win topic headings.
const QUICK_WIN_MARKER: &str = "⭐";

pub fn render_markdown(result: &AnalysisResult, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();

    writeln!(out, "# Exam Priority Matrix").unwrap();
    writeln!(out).unwrap();
    writeln!(
        out,
        "Generated: {}",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    )
    .unwrap();
    writeln!(out).unwrap();

    writeln!(out, "## Summary").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "- Total topics: {}", result.summary.total_topics).unwrap();
    writeln!(
        out,
        "- High priority: {}",
        result.summary.high_priority_count
    )
    .unwrap();
    writeln!(
        out,
        "- Quick wins (low effort, high reward): {}",
        result.summary.low_effort_high_reward
    )
    .unwrap();
    writeln!(out).unwrap();

    for (rank, topic) in result.topics_by_confidence().iter().enumerate() {
        let marker = if topic.is_quick_win() {
            format!(" {QUICK_WIN_MARKER}")
        } else {
            String::new()
        };
        writeln!(out, "## {}. {}{marker}", rank + 1, topic.name).unwrap();
        writeln!(out).unwrap();
        writeln!(out, "- Confidence: {}%", topic.confidence).unwrap();
        writeln!(out, "- Effort: {}", topic.effort).unwrap();
        writeln!(out, "- Reward: {}", topic.reward).unwrap();
        writeln!(out, "- Frequency: seen {} time(s)", topic.frequency).unwrap();
        writeln!(out, "- Priority: {}", topic.priority()).unwrap();
        if !topic.key_concepts.is_empty() {
            writeln!(out, "- Key concepts: {}", topic.key_concepts.join(", ")).unwrap();
        }
        writeln!(out).unwrap();
    }

    out
}
