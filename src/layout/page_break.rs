//! # Page Break Decisions
//!
//! The rules that keep a day heading from being stranded at the bottom of a
//! page. They only look at heights; the layout engine measures the blocks
//! that follow a heading and asks here whether to break first.

use crate::config::OrphanSettings;

/// What to do with a heading that is about to be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakDecision {
    /// Draw the heading on the current page.
    Place,
    /// Break the page first, so the heading leads the next one.
    MoveToNextPage,
}

/// How many of `line_heights`, taken in order, fit into `space`.
pub fn lines_that_fit(space: f64, line_heights: &[f64]) -> usize {
    let mut used = 0.0;
    let mut fit = 0;
    for &h in line_heights {
        if used + h > space {
            break;
        }
        used += h;
        fit += 1;
    }
    fit
}

/// Vertical room taken by a heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingRoom {
    /// Space the heading line needs to be drawn on this page: the spacing
    /// above it, a pending month banner, and the line itself.
    pub needed: f64,
    /// Spacing below the heading, before its content starts.
    pub after: f64,
}

/// Decide whether a heading should be deferred to the next page.
///
/// `available` is the distance from the cursor down to the bottom margin
/// and `following` the heights of the content lines that come after the
/// heading, each including any gap in front of it. A heading that cannot be
/// drawn here moves, so a month banner above it moves too. Otherwise it
/// moves when fewer than `min_following_lines` of those lines fit under it
/// and the space left under it is below `min_page_fraction` of the page.
/// A heading with nothing after it stays.
pub fn decide_heading_break(
    available: f64,
    heading: HeadingRoom,
    following: &[f64],
    page_height: f64,
    rules: &OrphanSettings,
) -> BreakDecision {
    if heading.needed > available {
        return BreakDecision::MoveToNextPage;
    }
    if following.is_empty() {
        return BreakDecision::Place;
    }

    let under_heading = available - heading.needed - heading.after;
    let fit = lines_that_fit(under_heading, following);
    let cramped = under_heading < rules.min_page_fraction * page_height;

    if fit < rules.min_following_lines && cramped {
        BreakDecision::MoveToNextPage
    } else {
        BreakDecision::Place
    }
}
