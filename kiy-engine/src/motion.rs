//! Motion-force resolution
//!
//! Deterministic scoring heuristic that ranks several weighted
//! "forces" and selects the strongest one's target label as the
//! resolved musical style. The only nondeterministic input, the moon
//! phase, is injected as a picker function so results are replayable.

use kiy_common::GenerationRequest;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One weighted input to the resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceContribution {
    /// Label of the force's origin (e.g. "Gravity Well")
    pub source: String,
    /// Relative strength, unitless, non-negative
    pub magnitude: f64,
    /// Style label this force selects if it wins
    pub target_region: String,
}

/// Resolver output: the winning style plus the full force list for
/// display and audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMotion {
    pub resolved_style: String,
    pub contributing_forces: Vec<ForceContribution>,
}

/// Contextual creative force paired with the style it pulls toward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoonPhase {
    pub name: &'static str,
    pub tag: &'static str,
}

/// The four moon phases, one chosen uniformly at random per request
pub const MOON_PHASES: [MoonPhase; 4] = [
    MoonPhase { name: "Reflection", tag: "Atmospheric" },
    MoonPhase { name: "Crescendo", tag: "Energetic" },
    MoonPhase { name: "Stillness", tag: "Minimalist" },
    MoonPhase { name: "Eclipse", tag: "Experimental" },
];

/// Resolve forces with a randomly chosen moon phase.
pub fn resolve(request: &GenerationRequest) -> ResolvedMotion {
    resolve_with(request, |n| rand::thread_rng().gen_range(0..n))
}

/// Resolve forces with an injected moon-phase picker.
///
/// `pick_phase` receives the phase count and must return an index
/// below it; tests pass a constant to make the run reproducible.
///
/// Forces, in emission order:
/// 1. Gravity Well (10) — the chosen genre, the strongest pull.
/// 2. Will (5, +2 title, +5 lyrics over 50 chars, +3 chorus marker) —
///    only when the user supplied a title or lyrics; targets the
///    genre as well.
/// 3. Moon Phase (7) — the picked contextual force.
/// 4. Sun (2) — constant baseline toward "Melodic".
///
/// The highest magnitude wins; the first-seen force keeps ties.
pub fn resolve_with(
    request: &GenerationRequest,
    pick_phase: impl FnOnce(usize) -> usize,
) -> ResolvedMotion {
    let mut forces = Vec::with_capacity(4);

    forces.push(ForceContribution {
        source: "Gravity Well".to_string(),
        magnitude: 10.0,
        target_region: request.genre.clone(),
    });

    if request.title.is_some() || request.lyrics.is_some() {
        forces.push(ForceContribution {
            source: "Will".to_string(),
            magnitude: will_magnitude(request),
            target_region: request.genre.clone(),
        });
    }

    let phase = MOON_PHASES[pick_phase(MOON_PHASES.len())];
    forces.push(ForceContribution {
        source: format!("Moon Phase ({})", phase.name),
        magnitude: 7.0,
        target_region: phase.tag.to_string(),
    });

    forces.push(ForceContribution {
        source: "Sun".to_string(),
        magnitude: 2.0,
        target_region: "Melodic".to_string(),
    });

    // Left-to-right scan; strictly greater magnitude replaces, so the
    // first-seen force wins ties.
    let strongest = forces
        .iter()
        .skip(1)
        .fold(&forces[0], |best, force| {
            if force.magnitude > best.magnitude {
                force
            } else {
                best
            }
        });

    let resolved_style = strongest.target_region.clone();

    ResolvedMotion {
        resolved_style,
        contributing_forces: forces,
    }
}

/// Creative-intent weight: base 5, +2 for a title, +5 for lyrics
/// longer than 50 characters, +3 for an explicit chorus marker.
fn will_magnitude(request: &GenerationRequest) -> f64 {
    let mut magnitude = 5.0;
    if request.title.is_some() {
        magnitude += 2.0;
    }
    if let Some(lyrics) = &request.lyrics {
        if lyrics.len() > 50 {
            magnitude += 5.0;
        }
        if lyrics.contains("[Chorus]") {
            magnitude += 3.0;
        }
    }
    magnitude
}
