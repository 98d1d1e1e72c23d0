//! Mental-health self-assessment scoring
//!
//! Each answer is scored 0-3; the total maps to a risk level. A total at or
//! above [`CRISIS_THRESHOLD`] raises a crisis notification.

use serde::Serialize;

use super::ValidationError;

/// Totals at or above this raise a crisis alert.
pub const CRISIS_THRESHOLD: i32 = 20;

/// Highest score a single answer may carry.
pub const MAX_ANSWER_VALUE: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn from_score(total: i32) -> Self {
        match total {
            t if t < 10 => Self::Low,
            t if t < CRISIS_THRESHOLD => Self::Moderate,
            _ => Self::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

/// One validated answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answer {
    pub question_id: i64,
    pub value: i32,
}

impl Answer {
    pub fn new(question_id: Option<i64>, value: Option<i32>) -> Result<Self, ValidationError> {
        let question_id = question_id.ok_or(ValidationError::Required {
            field: "answers.questionId",
        })?;
        let value = value.ok_or(ValidationError::Required {
            field: "answers.value",
        })?;
        if !(0..=MAX_ANSWER_VALUE).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field: "answers.value",
                min: 0.0,
                max: f64::from(MAX_ANSWER_VALUE),
            });
        }
        Ok(Self { question_id, value })
    }
}

/// A scored submission ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredAssessment {
    pub user_id: Option<i64>,
    pub answers: Vec<Answer>,
    pub total_score: i32,
    pub risk_level: RiskLevel,
}

impl ScoredAssessment {
    /// Score a submission.
    ///
    /// When answers are supplied the total is their sum, and a client-supplied
    /// `total_score` must agree with it. Without answers, `total_score` is
    /// required.
    pub fn new(
        user_id: Option<i64>,
        answers: Vec<Answer>,
        total_score: Option<i32>,
    ) -> Result<Self, ValidationError> {
        let total_score = if answers.is_empty() {
            total_score.ok_or(ValidationError::Required { field: "totalScore" })?
        } else {
            let sum: i32 = answers.iter().map(|a| a.value).sum();
            if total_score.is_some_and(|t| t != sum) {
                return Err(ValidationError::InvalidFormat {
                    field: "totalScore",
                    reason: "does not match the sum of answers",
                });
            }
            sum
        };

        if total_score < 0 {
            return Err(ValidationError::OutOfRange {
                field: "totalScore",
                min: 0.0,
                max: f64::from(i32::MAX),
            });
        }

        Ok(Self {
            user_id,
            answers,
            total_score,
            risk_level: RiskLevel::from_score(total_score),
        })
    }

    pub fn needs_crisis_alert(&self) -> bool {
        self.total_score >= CRISIS_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(values: &[i32]) -> Vec<Answer> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Answer::new(Some(i as i64 + 1), Some(*v)).unwrap())
            .collect()
    }

    #[test]
    fn risk_bands() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(9), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(10), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(19), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(20), RiskLevel::High);
    }

    #[test]
    fn total_is_sum_of_answers() {
        let scored = ScoredAssessment::new(None, answers(&[3, 3, 3, 3, 3, 3, 2]), None).unwrap();
        assert_eq!(scored.total_score, 20);
        assert!(scored.needs_crisis_alert());
    }

    #[test]
    fn threshold_is_inclusive() {
        let below = ScoredAssessment::new(Some(1), vec![], Some(19)).unwrap();
        assert!(!below.needs_crisis_alert());
        let at = ScoredAssessment::new(Some(1), vec![], Some(20)).unwrap();
        assert!(at.needs_crisis_alert());
        assert_eq!(at.risk_level, RiskLevel::High);
    }

    #[test]
    fn mismatched_total_rejected() {
        let err = ScoredAssessment::new(None, answers(&[1, 1]), Some(5)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { field: "totalScore", .. }));
    }

    #[test]
    fn missing_total_without_answers_rejected() {
        let err = ScoredAssessment::new(None, vec![], None).unwrap_err();
        assert_eq!(err, ValidationError::Required { field: "totalScore" });
    }

    #[test]
    fn negative_total_rejected() {
        assert!(ScoredAssessment::new(None, vec![], Some(-1)).is_err());
    }

    #[test]
    fn answer_range() {
        assert!(Answer::new(Some(1), Some(4)).is_err());
        assert!(Answer::new(Some(1), Some(-1)).is_err());
        assert!(Answer::new(None, Some(1)).is_err());
        assert!(Answer::new(Some(1), None).is_err());
        assert_eq!(
            Answer::new(Some(2), Some(3)).unwrap(),
            Answer { question_id: 2, value: 3 }
        );
    }
}
