//! Plain-text rendering of comparison outcomes and system lists.

use specdeck_core::evaluator::Winner;
use specdeck_core::params::Side;
use specdeck_core::selection::SideState;
use specdeck_core::source::SystemSummary;
use specdeck_core::view::{ComparisonMatrix, SideHeader};
use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

const GAP: &str = "  ";
const WIN_MARK: &str = " *";
const TIE_MARK: &str = " =";

/// Left-align `text` in a column `width` terminal cells wide.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

fn title(header: &SideHeader) -> String {
    match &header.variant_name {
        Some(variant) => format!("{} ({})", header.name, variant),
        None => header.name.clone(),
    }
}

fn subtitle(header: &SideHeader) -> String {
    let mut parts = Vec::new();
    if let Some(manufacturer) = &header.manufacturer {
        parts.push(manufacturer.clone());
    }
    if let Some(year) = header.release_year {
        parts.push(year.to_string());
    }
    parts.join(", ")
}

fn marked(display: &str, winner: Option<Winner>, side: Winner) -> String {
    match winner {
        Some(Winner::Tie) => format!("{display}{TIE_MARK}"),
        Some(w) if w == side => format!("{display}{WIN_MARK}"),
        _ => display.to_string(),
    }
}

/// Render a ready comparison as an aligned table.
///
/// The better value carries `*`; equal values worth comparing carry `=`.
pub fn render_matrix(matrix: &ComparisonMatrix) -> String {
    let cells: Vec<(String, String)> = matrix
        .entries
        .iter()
        .map(|entry| {
            let row = &entry.row;
            (
                marked(&row.display_a, row.winner, Winner::A),
                marked(&row.display_b, row.winner, Winner::B),
            )
        })
        .collect();

    let left_title = title(&matrix.left);
    let left_sub = subtitle(&matrix.left);
    let label_width = matrix
        .entries
        .iter()
        .map(|e| e.row.metric.label.width())
        .max()
        .unwrap_or(0);
    let left_width = cells
        .iter()
        .map(|(a, _)| a.width())
        .chain([left_title.width(), left_sub.width()])
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}{GAP}{}{GAP}{}",
        pad("", label_width),
        pad(&left_title, left_width),
        title(&matrix.right)
    );
    let right_sub = subtitle(&matrix.right);
    if !left_sub.is_empty() || !right_sub.is_empty() {
        let _ = writeln!(
            out,
            "{}{GAP}{}{GAP}{}",
            pad("", label_width),
            pad(&left_sub, left_width),
            right_sub
        );
    }

    if matrix.entries.is_empty() {
        out.push_str("\nNo rows to show.\n");
    }

    for (entry, (a, b)) in matrix.entries.iter().zip(&cells) {
        if let Some(category) = entry.category_header {
            let _ = writeln!(out, "\n-- {} --", category);
        }
        let line = format!(
            "{}{GAP}{}{GAP}{}",
            pad(entry.row.metric.label, label_width),
            pad(a, left_width),
            b
        );
        let _ = writeln!(out, "{}", line.trim_end());
    }

    let tally = matrix.tally;
    let _ = writeln!(
        out,
        "\n{} wins {}, {} wins {}, {} tied",
        matrix.left.name, tally.a, matrix.right.name, tally.b, tally.ties
    );
    out
}

/// Render the placeholder shown while a side is not ready.
pub fn render_awaiting(states: &[(Side, SideState)]) -> String {
    let mut out = String::from("Awaiting selection.\n");
    for (side, state) in states {
        let reason = match state {
            SideState::Empty => format!("pick a system with --{}", side_flag(*side)),
            SideState::Loading { slug } => format!("still loading '{slug}'"),
            SideState::Failed { slug, error } => format!("could not load '{slug}': {error}"),
            SideState::Ready(_) => continue,
        };
        let _ = writeln!(out, "  {side}: {reason}");
    }
    out
}

fn side_flag(side: Side) -> &'static str {
    match side {
        Side::Left => "a",
        Side::Right => "b",
    }
}

/// Render systems as `slug  name` lines.
pub fn render_systems(systems: &[SystemSummary]) -> String {
    let width = systems.iter().map(|s| s.slug.width()).max().unwrap_or(0);
    systems
        .iter()
        .map(|s| format!("{}{GAP}{}\n", pad(&s.slug, width), s.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use specdeck_core::error::CatalogError;
    use specdeck_core::selection::ReadySide;
    use specdeck_core::spec::SystemRecord;
    use specdeck_core::view::{self, ComparisonOutcome, ViewOptions};
    use std::sync::Arc;

    fn system(json: &str) -> Arc<SystemRecord> {
        Arc::new(serde_json::from_str(json).unwrap())
    }

    fn ready(json: &str) -> SideState {
        SideState::Ready(ReadySide::new(system(json), None))
    }

    fn matrix(options: ViewOptions) -> ComparisonMatrix {
        let left = ready(
            r#"{"slug":"deck","name":"Deck","manufacturer":"Valve","release_year":2022,
                "base_spec":{"cpu_name":"Aerith","cpu_cores":4,"refresh_rate_hz":60}}"#,
        );
        let right = ready(
            r#"{"slug":"ally","name":"Ally",
                "base_spec":{"cpu_name":"Z1","cpu_cores":8,"refresh_rate_hz":60}}"#,
        );
        match view::build(&left, &right, options) {
            ComparisonOutcome::Matrix(m) => m,
            other => panic!("expected matrix, got {other:?}"),
        }
    }

    #[test]
    fn test_pad_counts_wide_characters() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("日本", 5), "日本 ");
        assert_eq!(pad("toolong", 3), "toolong");
    }

    #[test]
    fn test_render_matrix_marks_winners_and_ties() {
        let text = render_matrix(&matrix(ViewOptions::default()));
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("Deck") && lines[0].contains("Ally"));
        assert!(lines[1].contains("Valve, 2022"));
        assert!(text.contains("-- Processor --"));
        assert!(text.contains("-- Display --"));

        let cores = lines.iter().find(|l| l.starts_with("CPU Cores")).unwrap();
        assert!(cores.ends_with("8 *"));
        assert!(!cores.contains("4 *"));

        let refresh = lines.iter().find(|l| l.starts_with("Refresh Rate")).unwrap();
        assert_eq!(refresh.matches(" =").count(), 2);

        let cpu = lines.iter().find(|l| l.starts_with("CPU ")).unwrap();
        assert!(!cpu.contains('*'));

        assert!(text.ends_with("Deck wins 0, Ally wins 1, 1 tied\n"));
    }

    #[test]
    fn test_render_matrix_aligns_columns() {
        let text = render_matrix(&matrix(ViewOptions::default()));
        let cores = text.lines().find(|l| l.starts_with("CPU Cores")).unwrap();
        let refresh = text.lines().find(|l| l.starts_with("Refresh Rate")).unwrap();
        assert_eq!(cores.find('8'), refresh.rfind("60"));
    }

    #[test]
    fn test_render_matrix_without_headers() {
        let text = render_matrix(&matrix(ViewOptions {
            diff_only: true,
            show_category_headers: false,
        }));
        assert!(!text.contains("--"));
        assert!(!text.contains("Refresh Rate"));
    }

    #[test]
    fn test_render_awaiting_explains_each_side() {
        let text = render_awaiting(&[
            (Side::Left, SideState::Empty),
            (
                Side::Right,
                SideState::Failed {
                    slug: "ghost".into(),
                    error: CatalogError::NotFound {
                        slug: "ghost".into(),
                    },
                },
            ),
        ]);
        assert!(text.starts_with("Awaiting selection."));
        assert!(text.contains("left: pick a system with --a"));
        assert!(text.contains("right: could not load 'ghost'"));
    }

    #[test]
    fn test_render_systems_aligns_names() {
        let text = render_systems(&[
            SystemSummary {
                name: "Steam Deck".into(),
                slug: "steam-deck".into(),
            },
            SystemSummary {
                name: "ROG Ally".into(),
                slug: "rog-ally".into(),
            },
        ]);
        assert_eq!(text, "steam-deck  Steam Deck\nrog-ally    ROG Ally\n");
    }
}
