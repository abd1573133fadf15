//! Coaching feedback synthesis
//!
//! Turns the metrics into ranked findings, strengths, a main coaching tip
//! and a target score. Fully deterministic: the same metrics always give the
//! same text in the same order.

use super::result::{CoachFinding, MetricKey, Severity, ShotMetrics};
use crate::config::FindingsConfig;

/// Fixed coaching copy for one metric
struct FindingTemplate {
    title: &'static str,
    diagnosis: &'static str,
    correction: &'static str,
    drill: &'static str,
}

fn template(key: MetricKey) -> FindingTemplate {
    match key {
        MetricKey::StanceWidth => FindingTemplate {
            title: "Set your base",
            diagnosis: "Your feet are not about shoulder-width apart, which makes the shot harder to repeat.",
            correction: "Set your feet shoulder-width apart with the shooting-side foot slightly forward.",
            drill: "Stance check: 20 form shots from 3 feet, resetting your feet to shoulder width before each one.",
        },
        MetricKey::LateralSway => FindingTemplate {
            title: "Stay balanced",
            diagnosis: "Your torso drifts sideways during the shot, pulling the ball off line.",
            correction: "Keep your head and chest centered over your base from the dip through the release.",
            drill: "Line shooting: stand on a court line and shoot 25 shots, landing on the same line every time.",
        },
        MetricKey::KneeDip => FindingTemplate {
            title: "Use your legs",
            diagnosis: "There is little knee bend before the release, so the arms are doing most of the work.",
            correction: "Dip 20 to 40 degrees at the knees and rise straight into the shot.",
            drill: "Chair taps: 3 sets of 10 shots, lightly tapping a chair behind you on each dip.",
        },
        MetricKey::VerticalDrive => FindingTemplate {
            title: "Drive straight up",
            diagnosis: "Your body moves forward or sideways into the shot instead of straight up.",
            correction: "Push up through the floor and let your hips rise under your shoulders.",
            drill: "Jump-and-stick: 15 jump shots close to the rim, landing on the spot you took off from.",
        },
        MetricKey::ElbowAlignment => FindingTemplate {
            title: "Extend your shooting arm",
            diagnosis: "Your shooting arm is not fully extended at the release point.",
            correction: "Finish with your elbow locked out above your eyebrow and your arm reaching toward the rim.",
            drill: "One-hand form shooting: 3 sets of 15 shots from 5 feet, holding full extension for a count of two.",
        },
        MetricKey::ElbowUnderBall => FindingTemplate {
            title: "Elbow under the ball",
            diagnosis: "Your elbow flares away from the line under the ball at release.",
            correction: "Stack wrist over elbow so your forearm points straight up at the set point.",
            drill: "Wall shooting: 20 shots standing an arm's length from a wall, keeping the elbow in line.",
        },
        MetricKey::ReleaseHeight => FindingTemplate {
            title: "Release higher",
            diagnosis: "The ball leaves your hand low relative to your set point, giving a flat arc.",
            correction: "Lift the ball through your forehead and release at the top of your reach.",
            drill: "High-release reps: 25 shots over a raised hand or pad held by a partner.",
        },
        MetricKey::WristFlick => FindingTemplate {
            title: "Snap your wrist",
            diagnosis: "Your wrist barely snaps through at release, so the ball gets little backspin.",
            correction: "Flick your wrist forward so your fingers point at the rim after the ball leaves.",
            drill: "Lying-down flicks: 30 one-hand flicks straight up to yourself, focusing on backspin.",
        },
        MetricKey::FollowThroughHold => FindingTemplate {
            title: "Hold the follow-through",
            diagnosis: "Your shooting hand drops right after the release.",
            correction: "Hold your arm up with the wrist relaxed until the ball reaches the rim.",
            drill: "Freeze finish: 20 shots holding the follow-through until the ball hits the floor.",
        },
        MetricKey::LandingBalance => FindingTemplate {
            title: "Land balanced",
            diagnosis: "Your feet land in a different position than they started, a sign of an off-balance shot.",
            correction: "Land softly on both feet in the same stance you jumped from.",
            drill: "Landing spots: mark your feet with tape and take 20 shots, landing on the marks each time.",
        },
    }
}

/// Strengths used to pad the list when too few metrics qualify
const FILLER_STRENGTHS: [&str; 3] = [
    "Committed to a full shooting motion",
    "Shot captured clearly enough for a complete breakdown",
    "Building good habits by reviewing your form",
];

const KEEP_REFINING_TIP: &str =
    "Solid mechanics across the board. Keep refining by repeating this exact form on every rep.";

/// Everything the findings engine derives from a set of metrics
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackReport {
    /// Findings, most severe and lowest value first
    pub findings: Vec<CoachFinding>,
    /// Coaching text of the top findings
    pub improvements: Vec<String>,
    /// Exactly `strength_count` strengths
    pub strengths: Vec<String>,
    /// Main coaching tip
    pub coach_tip: String,
    /// Next milestone score
    pub target_score: u32,
}

fn percent(value: f32) -> u32 {
    (value.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// Severity for a metric value, or `None` if the value does not warrant a finding
pub fn severity_for(value: f32, config: &FindingsConfig) -> Option<Severity> {
    if value >= config.finding_cutoff {
        None
    } else if value < config.severe_below {
        Some(Severity::Major)
    } else if value < config.moderate_below {
        Some(Severity::Moderate)
    } else {
        Some(Severity::Minor)
    }
}

/// Build the finding for one metric, if it is below the cutoff
pub fn build_finding(key: MetricKey, value: f32, config: &FindingsConfig) -> Option<CoachFinding> {
    let severity = severity_for(value, config)?;
    let t = template(key);
    let current = percent(value);
    let target = percent(config.finding_cutoff);

    Some(CoachFinding {
        key,
        severity,
        metric_value: value,
        title: t.title.to_string(),
        diagnosis: t.diagnosis.to_string(),
        evidence: format!(
            "Your {} scored {}% (target {}% or higher).",
            key.display_name(),
            current,
            target
        ),
        correction: t.correction.to_string(),
        drill: t.drill.to_string(),
        success_criteria: format!(
            "Raise your {} from {}% to at least {}% on your next recorded shot.",
            key.display_name(),
            current,
            target
        ),
    })
}

/// All findings, sorted by severity (desc) then metric value (asc)
///
/// Ties keep the canonical metric order.
pub fn rank_findings(metrics: &ShotMetrics, config: &FindingsConfig) -> Vec<CoachFinding> {
    let mut findings: Vec<CoachFinding> = metrics
        .iter()
        .filter_map(|(key, value)| build_finding(key, value, config))
        .collect();
    findings.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.metric_value.total_cmp(&b.metric_value))
    });
    findings
}

/// Up to `strength_count` best metrics at or above the strength cutoff,
/// padded with generic strengths to exactly `strength_count`
pub fn select_strengths(metrics: &ShotMetrics, config: &FindingsConfig) -> Vec<String> {
    let mut strong: Vec<(MetricKey, f32)> = metrics
        .iter()
        .filter(|&(_, v)| v >= config.strength_cutoff)
        .collect();
    strong.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut strengths: Vec<String> = strong
        .into_iter()
        .take(config.strength_count)
        .map(|(key, value)| format!("Strong {} ({}%)", key.display_name(), percent(value)))
        .collect();

    let missing = config.strength_count.saturating_sub(strengths.len());
    strengths.extend(
        FILLER_STRENGTHS
            .iter()
            .cycle()
            .take(missing)
            .map(|s| s.to_string()),
    );
    strengths
}

/// Next milestone: `min(100, ceil((score + 5) / 5) × 5)`
///
/// Always a multiple of 5 and above `score`, except at 100 where it is capped.
pub fn target_score(score: u32) -> u32 {
    ((score + 5 + 4) / 5 * 5).min(100)
}

/// Derive findings, strengths, main tip and target score
pub fn build_feedback(metrics: &ShotMetrics, score: u32, config: &FindingsConfig) -> FeedbackReport {
    let findings = rank_findings(metrics, config);
    let improvements: Vec<String> = findings
        .iter()
        .take(config.max_improvements)
        .map(CoachFinding::coaching_text)
        .collect();
    let strengths = select_strengths(metrics, config);

    let coach_tip = match findings.first() {
        Some(main) => format!("Main focus: {}. {}", main.title, main.correction),
        None => KEEP_REFINING_TIP.to_string(),
    };

    log::debug!(
        "Feedback: {} findings ({} shown), {} strengths, main issue {:?}",
        findings.len(),
        improvements.len(),
        strengths.len(),
        findings.first().map(|f| f.key)
    );

    FeedbackReport {
        findings,
        improvements,
        strengths,
        coach_tip,
        target_score: target_score(score),
    }
}
