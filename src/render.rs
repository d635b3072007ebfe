//! Text and JSON rendering of generated plans.

use std::fmt::Write;

use crate::domain::{Block, ExerciseLine, Plan, PlanKind, Section};

/// Formats a plan as plain text ending in exactly one newline.
///
/// Layout: title, weight summary, optional header text, then one block per
/// day or week, separated by blank lines.
pub fn render(plan: &Plan) -> String {
    let mut paragraphs = vec![plan.title.clone(), render_summary(plan)];

    if let Some(header) = &plan.header {
        let header = header.trim_matches(['\n', '\r']);
        if !header.trim().is_empty() {
            paragraphs.push(header.to_string());
        }
    }

    paragraphs.extend(plan.sections.iter().map(render_section));

    let mut output = paragraphs.join("\n\n");
    output.truncate(output.trim_end_matches('\n').len());
    output.push('\n');
    output
}

/// Serializes a plan as pretty-printed JSON.
pub fn render_json(plan: &Plan) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(plan)
}

fn render_summary(plan: &Plan) -> String {
    let mut out = String::new();
    match plan.kind {
        PlanKind::Hlm => {
            out.push_str("Weights:");
            for line in &plan.summary {
                let _ = write!(
                    out,
                    "\n  {} (5s) - {} kg",
                    title_case(&line.name),
                    format_weight(line.weight)
                );
            }
        }
        PlanKind::Wendler => {
            out.push_str("Training Maxes:");
            for line in &plan.summary {
                let _ = write!(out, "\n  {}: {:.2} kg", title_case(&line.name), line.weight);
            }
        }
    }
    out
}

fn render_section(section: &Section) -> String {
    let mut out = format!("{}:", section.label);
    for block in &section.blocks {
        render_block(&mut out, block);
    }
    out
}

fn render_block(out: &mut String, block: &Block) {
    let indent = match &block.heading {
        Some(heading) => {
            let _ = write!(out, "\n  {}:", title_case(heading));
            "    "
        }
        None => "  ",
    };

    for line in &block.lines {
        let _ = write!(out, "\n{}{}", indent, render_line(line));
    }
}

fn render_line(line: &ExerciseLine) -> String {
    match line {
        ExerciseLine::Exercise {
            intensity,
            name,
            scheme,
            weight,
            note,
        } => {
            let mut text = format!("{} {} {}", intensity, title_case(name), scheme);
            if let Some(weight) = weight {
                let _ = write!(text, " - {} kg", format_weight(*weight));
            }
            if let Some(note) = note {
                let _ = write!(text, ", {}", note);
            }
            text
        }
        ExerciseLine::Set {
            number,
            reps,
            weight,
            percentage,
        } => format!(
            "Set {}: {} reps @ {} kg ({:.0}%)",
            number,
            reps,
            format_weight(*weight),
            percentage * 100.0
        ),
        ExerciseLine::Supplemental {
            label,
            prescription,
            weight,
            ..
        } => format!("{}: {} @ {} kg", label, prescription, format_weight(*weight)),
    }
}

fn format_weight(weight: f64) -> String {
    format!("{:.1}", weight)
}

/// Capitalizes the first letter of every word, leaving the rest untouched.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    out
}
