//! Comparison view: walks the metric catalog once and produces the ordered
//! matrix handed to the rendering layer.

use serde::Serialize;

use crate::catalog::{self, Category};
use crate::evaluator::{ComparisonRow, Winner, evaluate};
use crate::params::Side;
use crate::selection::{ReadySide, SelectionManager, SideState};
use crate::spec::EffectiveSpecification;

/// Rendering switches. Category dividers are on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewOptions {
    pub diff_only: bool,
    pub show_category_headers: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            diff_only: false,
            show_category_headers: true,
        }
    }
}

/// Header block describing one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SideHeader {
    pub side: Side,
    pub slug: String,
    pub name: String,
    pub manufacturer: Option<String>,
    pub variant_name: Option<String>,
    pub image: String,
    pub release_year: Option<u16>,
}

impl SideHeader {
    pub fn from_ready(side: Side, ready: &ReadySide) -> Self {
        let media = ready.media();
        Self {
            side,
            slug: ready.system.slug.clone(),
            name: ready.system.name.clone(),
            manufacturer: ready.system.manufacturer.clone(),
            variant_name: ready.variant().map(|v| v.name.clone()),
            image: media.image,
            release_year: media.release_year,
        }
    }
}

/// One visible row, optionally preceded by a section divider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_header: Option<Category>,
    pub row: ComparisonRow,
}

/// Count of rows won by each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WinnerTally {
    pub a: usize,
    pub b: usize,
    pub ties: usize,
}

impl WinnerTally {
    fn record(&mut self, winner: Option<Winner>) {
        match winner {
            Some(Winner::A) => self.a += 1,
            Some(Winner::B) => self.b += 1,
            Some(Winner::Tie) => self.ties += 1,
            None => {}
        }
    }
}

/// Full comparison output for two ready sides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonMatrix {
    pub left: SideHeader,
    pub right: SideHeader,
    pub entries: Vec<MatrixEntry>,
    pub tally: WinnerTally,
}

/// What the view shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonOutcome {
    /// At least one side is not ready; `waiting_on` lists which.
    AwaitingSelection { waiting_on: Vec<Side> },
    Matrix(ComparisonMatrix),
}

/// Build the outcome from both sides' states.
pub fn build(left: &SideState, right: &SideState, options: ViewOptions) -> ComparisonOutcome {
    match (left.ready(), right.ready()) {
        (Some(l), Some(r)) => {
            let (entries, tally) = matrix_rows(&l.effective, &r.effective, options);
            ComparisonOutcome::Matrix(ComparisonMatrix {
                left: SideHeader::from_ready(Side::Left, l),
                right: SideHeader::from_ready(Side::Right, r),
                entries,
                tally,
            })
        }
        _ => ComparisonOutcome::AwaitingSelection {
            waiting_on: [(Side::Left, left), (Side::Right, right)]
                .into_iter()
                .filter(|(_, state)| !state.is_ready())
                .map(|(side, _)| side)
                .collect(),
        },
    }
}

/// Build the outcome from a manager's current state.
pub fn build_from(manager: &SelectionManager, options: ViewOptions) -> ComparisonOutcome {
    build(
        &manager.state(Side::Left),
        &manager.state(Side::Right),
        options,
    )
}

/// Evaluate every catalog metric in order and keep the visible rows.
///
/// A divider is due whenever a definition's category differs from the
/// previous definition's. It is attached to the next visible row of that
/// category, so a section whose rows are all hidden shows no header.
pub fn matrix_rows(
    a: &EffectiveSpecification,
    b: &EffectiveSpecification,
    options: ViewOptions,
) -> (Vec<MatrixEntry>, WinnerTally) {
    let mut entries = Vec::new();
    let mut tally = WinnerTally::default();
    let mut previous: Option<Category> = None;
    let mut pending_header: Option<Category> = None;

    for metric in catalog::list() {
        if previous != Some(metric.category) {
            pending_header = Some(metric.category);
        }
        previous = Some(metric.category);

        let row = evaluate(metric, a, b, options.diff_only);
        if !row.visible {
            continue;
        }
        tally.record(row.winner);
        let category_header = if options.show_category_headers {
            pending_header.take()
        } else {
            None
        };
        entries.push(MatrixEntry {
            category_header,
            row,
        });
    }

    (entries, tally)
}
