use crate::classify::PageRole;
use serde::{Deserialize, Serialize};
use std::fmt;

const BASE_SCORE: i32 = 30;

/// Discretized QA priority bucket, P0 being the most important
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriorityTier {
    P0,
    P1,
    P2,
    P3,
}

impl PriorityTier {
    /// Maps a score to its tier; each threshold is inclusive
    pub fn from_score(score: u8) -> Self {
        match score {
            85.. => Self::P0,
            70..=84 => Self::P1,
            50..=69 => Self::P2,
            _ => Self::P3,
        }
    }

    /// P0 and P1 pages are critical
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::P0 | Self::P1)
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A page's priority score (0-100) and tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePriority {
    pub score: u8,
    pub tier: PriorityTier,
}

fn role_bonus(role: PageRole) -> i32 {
    match role {
        PageRole::Checkout => 50,
        PageRole::Login | PageRole::Signup | PageRole::Dashboard => 40,
        PageRole::Pricing | PageRole::Support => 25,
        PageRole::Home => 20,
        PageRole::Docs => 15,
        PageRole::Blog | PageRole::Other => 0,
    }
}

/// Scores how important a page is to cover in QA
///
/// Starts at 30, adds a role bonus, +10 for auth-gated pages, +10 for pages at
/// depth 0 or 1, and +15 for pages answering 4xx/5xx (a broken page still
/// needs inspecting). The score is clamped to 0..=100.
pub fn score_page(role: PageRole, auth_likely: bool, depth: u32, http_status: u16) -> PagePriority {
    let mut score = BASE_SCORE + role_bonus(role);

    if auth_likely {
        score += 10;
    }
    if depth <= 1 {
        score += 10;
    }
    if (400..600).contains(&http_status) {
        score += 15;
    }

    let score = score.clamp(0, 100) as u8;
    PagePriority {
        score,
        tier: PriorityTier::from_score(score),
    }
}
