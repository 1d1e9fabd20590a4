//! Geometric association of figure regions with title regions.
//!
//! A title qualifies as the caption of a figure when its top-left corner
//! falls inside a tolerance window derived from the figure's box: the title
//! must start horizontally within a multiplicative tolerance of the figure's
//! left edge, and vertically at or below the figure's bottom edge within a
//! multiplicative tolerance of it.

use serde::{Deserialize, Serialize};

use crate::domain::{BoundingBox, Region};

/// Tolerance windows for title matching, as fractional allowances applied
/// multiplicatively to figure coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchTolerances {
    /// Horizontal tolerance around the figure's left edge.
    pub x: f32,
    /// Vertical tolerance below the figure's bottom edge.
    pub y: f32,
}

impl Default for MatchTolerances {
    fn default() -> Self {
        Self { x: 0.2, y: 0.2 }
    }
}

/// Result of a title search: either a matched title region or an explicit
/// not-found sentinel. Callers must handle both arms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TitleMatch<'a> {
    /// The first title in group order that satisfied both tolerance
    /// conditions.
    Found(&'a Region),
    /// No title in the group satisfied the conditions.
    NotFound,
}

impl<'a> TitleMatch<'a> {
    /// Whether a title was found.
    pub fn is_found(&self) -> bool {
        matches!(self, TitleMatch::Found(_))
    }

    /// Converts the match into an `Option`.
    pub fn into_option(self) -> Option<&'a Region> {
        match self {
            TitleMatch::Found(region) => Some(region),
            TitleMatch::NotFound => None,
        }
    }
}

/// Searches the title group for the caption of a figure.
///
/// Iterates `titles` in group order and accepts the first candidate T
/// satisfying both:
///
/// - `figure.x1 * (1 - tol.x) <= T.x1 <= figure.x1 * (1 + tol.x)`
/// - `figure.y2 <= T.y1 <= figure.y2 * (1 + tol.y)`
///
/// First match wins; no scoring is applied among multiple qualifying
/// candidates. On densely packed pages this can attach the wrong caption
/// when several titles fall inside the window; that tie-break is a known
/// limitation kept for compatibility with observed behavior. An empty title
/// group returns [`TitleMatch::NotFound`] immediately.
pub fn find_title<'a>(
    figure: &BoundingBox,
    titles: &'a [Region],
    tolerances: MatchTolerances,
) -> TitleMatch<'a> {
    for candidate in titles {
        let title = &candidate.bbox;
        let x_match = figure.x1 * (1.0 - tolerances.x) <= title.x1
            && title.x1 <= figure.x1 * (1.0 + tolerances.x);
        let y_match = figure.y2 <= title.y1 && title.y1 <= figure.y2 * (1.0 + tolerances.y);
        if x_match && y_match {
            return TitleMatch::Found(candidate);
        }
    }
    TitleMatch::NotFound
}
