//! Boundary for optional feedback rewriting
//!
//! An external text service may rephrase the strengths, improvements and
//! coach tip for presentation. The integration here is the only place a
//! rewrite touches a result, and it copies back those three text fields and
//! nothing else: score, metrics and findings are never altered.

use serde::{Deserialize, Serialize};

use super::result::AnalysisResult;
use crate::config::FindingsConfig;
use crate::error::AnalysisError;

/// The rewritable text of a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackText {
    /// Strength lines
    pub strengths: Vec<String>,
    /// Improvement paragraphs
    pub improvements: Vec<String>,
    /// Main coaching tip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coach_tip: Option<String>,
}

impl FeedbackText {
    /// Extract the text fields of a result
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            strengths: result.strengths.clone(),
            improvements: result.improvements.clone(),
            coach_tip: result.coach_tip.clone(),
        }
    }
}

/// External text-rewriting collaborator
pub trait FeedbackRewriter {
    /// Rephrase the feedback; the score and metrics are supplied as read-only context
    fn rewrite(&self, text: &FeedbackText, result: &AnalysisResult) -> Result<FeedbackText, AnalysisError>;
}

/// Check that a rewrite keeps the shape the UI relies on
fn check_shape(rewritten: &FeedbackText, original: &FeedbackText, config: &FindingsConfig) -> Result<(), String> {
    if rewritten.strengths.len() != original.strengths.len() {
        return Err(format!(
            "expected {} strengths, got {}",
            original.strengths.len(),
            rewritten.strengths.len()
        ));
    }
    if rewritten.improvements.len() > config.max_improvements {
        return Err(format!(
            "expected at most {} improvements, got {}",
            config.max_improvements,
            rewritten.improvements.len()
        ));
    }
    if rewritten
        .strengths
        .iter()
        .chain(rewritten.improvements.iter())
        .any(|s| s.trim().is_empty())
    {
        return Err("empty feedback line".to_string());
    }
    Ok(())
}

/// Apply a rewrite to a result
///
/// Invalid results pass through untouched. If the rewriter fails or returns
/// text of the wrong shape, the original feedback is kept. Only `strengths`,
/// `improvements` and `coach_tip` can change.
pub fn apply_feedback_rewrite(
    result: &AnalysisResult,
    rewriter: &dyn FeedbackRewriter,
    config: &FindingsConfig,
) -> AnalysisResult {
    if result.is_invalid {
        return result.clone();
    }

    let original = FeedbackText::from_result(result);
    let rewritten = match rewriter.rewrite(&original, result) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Feedback rewrite failed, keeping original text: {}", e);
            return result.clone();
        }
    };

    if let Err(reason) = check_shape(&rewritten, &original, config) {
        log::warn!("Feedback rewrite rejected ({}), keeping original text", reason);
        return result.clone();
    }

    AnalysisResult {
        strengths: rewritten.strengths,
        improvements: rewritten.improvements,
        coach_tip: rewritten.coach_tip.or(original.coach_tip),
        ..result.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::metadata::AnalysisMetadata;
    use crate::analysis::result::{InvalidReason, ShotMetrics};

    struct Shouting;

    impl FeedbackRewriter for Shouting {
        fn rewrite(&self, text: &FeedbackText, _result: &AnalysisResult) -> Result<FeedbackText, AnalysisError> {
            Ok(FeedbackText {
                strengths: text.strengths.iter().map(|s| s.to_uppercase()).collect(),
                improvements: text.improvements.iter().map(|s| s.to_uppercase()).collect(),
                coach_tip: text.coach_tip.as_ref().map(|s| s.to_uppercase()),
            })
        }
    }

    struct Failing;

    impl FeedbackRewriter for Failing {
        fn rewrite(&self, _text: &FeedbackText, _result: &AnalysisResult) -> Result<FeedbackText, AnalysisError> {
            Err(AnalysisError::ProcessingError("service unavailable".to_string()))
        }
    }

    struct DropsStrengths;

    impl FeedbackRewriter for DropsStrengths {
        fn rewrite(&self, text: &FeedbackText, _result: &AnalysisResult) -> Result<FeedbackText, AnalysisError> {
            Ok(FeedbackText {
                strengths: vec![],
                ..text.clone()
            })
        }
    }

    fn valid_result() -> AnalysisResult {
        AnalysisResult {
            score: 82,
            metrics: ShotMetrics {
                elbow_alignment: 0.9,
                ..ShotMetrics::zero()
            },
            strengths: vec!["a".into(), "b".into(), "c".into()],
            improvements: vec!["fix it".into()],
            findings: vec![],
            coach_tip: Some("tip".into()),
            target_score: 85,
            is_invalid: false,
            invalid_reason: None,
            message_if_invalid: None,
            processed_frames: 20,
            total_frames: 20,
            metadata: AnalysisMetadata::default(),
        }
    }

    #[test]
    fn test_rewrite_only_touches_text() {
        let original = valid_result();
        let rewritten = apply_feedback_rewrite(&original, &Shouting, &FindingsConfig::default());
        assert_eq!(rewritten.strengths, vec!["A", "B", "C"]);
        assert_eq!(rewritten.improvements, vec!["FIX IT"]);
        assert_eq!(rewritten.coach_tip.as_deref(), Some("TIP"));
        assert_eq!(rewritten.score, original.score);
        assert_eq!(rewritten.metrics, original.metrics);
        assert_eq!(rewritten.target_score, original.target_score);
    }

    #[test]
    fn test_failed_rewrite_keeps_original() {
        let original = valid_result();
        assert_eq!(
            apply_feedback_rewrite(&original, &Failing, &FindingsConfig::default()),
            original
        );
    }

    #[test]
    fn test_malformed_rewrite_rejected() {
        let original = valid_result();
        assert_eq!(
            apply_feedback_rewrite(&original, &DropsStrengths, &FindingsConfig::default()),
            original
        );
    }

    #[test]
    fn test_invalid_results_not_rewritten() {
        let invalid = AnalysisResult::invalid(InvalidReason::VideoTooShort, 0, 0, AnalysisMetadata::default());
        assert_eq!(
            apply_feedback_rewrite(&invalid, &Shouting, &FindingsConfig::default()),
            invalid
        );
    }
}
