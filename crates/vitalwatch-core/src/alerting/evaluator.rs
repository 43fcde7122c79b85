//! Rule evaluation engine

use tracing::debug;

use super::rules::{
    HypotensiveHypoxemiaRule, IrregularBeatRule, RapidDropRule, RuleEvaluator, ThresholdRule,
    TrendRule,
};
use crate::models::Finding;
use crate::storage::PatientHistory;

/// Runs a fixed, ordered set of rules over a patient history
///
/// Evaluation holds no state between calls: evaluating the same history
/// twice yields the same findings twice.
pub struct AlertEvaluator {
    rules: Vec<Box<dyn RuleEvaluator>>,
}

impl Default for AlertEvaluator {
    fn default() -> Self {
        Self::standard()
    }
}

impl AlertEvaluator {
    /// Create an evaluator over an explicit rule list
    pub fn new(rules: Vec<Box<dyn RuleEvaluator>>) -> Self {
        Self { rules }
    }

    /// The clinical rule set: blood pressure, then ECG, then saturation,
    /// then the combined condition
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(TrendRule::systolic()),
            Box::new(TrendRule::diastolic()),
            Box::new(ThresholdRule::blood_pressure()),
            Box::new(ThresholdRule::heart_rate()),
            Box::new(IrregularBeatRule::new()),
            Box::new(RapidDropRule::new()),
            Box::new(ThresholdRule::saturation()),
            Box::new(HypotensiveHypoxemiaRule::new()),
        ])
    }

    /// Registered rules in evaluation order
    pub fn rules(&self) -> &[Box<dyn RuleEvaluator>] {
        &self.rules
    }

    /// Evaluate every rule and concatenate findings in rule order
    pub fn evaluate(&self, history: &PatientHistory, now: i64) -> Vec<Finding> {
        let mut findings = Vec::new();

        for rule in &self.rules {
            let rule_findings = rule.evaluate(history, now);

            debug!(
                patient_id = history.patient_id(),
                rule = rule.name(),
                records = history.len(),
                findings = rule_findings.len(),
                "Evaluated rule"
            );

            findings.extend(rule_findings);
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::super::rules::history_of;
    use super::*;
    use crate::models::FindingKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_rule_order() {
        let evaluator = AlertEvaluator::standard();
        let names: Vec<&str> = evaluator.rules().iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec![
                "systolic-trend",
                "diastolic-trend",
                "blood-pressure-threshold",
                "heart-rate-threshold",
                "irregular-beat",
                "saturation-rapid-drop",
                "saturation-threshold",
                "hypotensive-hypoxemia",
            ]
        );
    }

    #[test]
    fn test_findings_follow_rule_order_not_record_order() {
        let history = history_of(&[
            ("Saturation", 90.0, 1),
            ("ECG", 115.0, 2),
            ("SystolicPressure", 170.0, 3),
            ("SystolicPressure", 150.0, 4),
            ("SystolicPressure", 120.0, 5),
        ]);

        let kinds: Vec<FindingKind> = AlertEvaluator::standard()
            .evaluate(&history, 0)
            .into_iter()
            .map(|f| f.kind)
            .collect();

        assert_eq!(
            kinds,
            vec![
                FindingKind::SystolicTrend,
                FindingKind::HeartRateOutOfRange,
                FindingKind::LowSaturation,
            ]
        );
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let history = history_of(&[("SystolicPressure", 85.0, 1), ("Saturation", 90.0, 2)]);
        let evaluator = AlertEvaluator::standard();

        let first = evaluator.evaluate(&history, 7);
        let second = evaluator.evaluate(&history, 7);

        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_empty_history_has_no_findings() {
        let history = history_of(&[]);
        assert!(AlertEvaluator::standard().evaluate(&history, 0).is_empty());
    }
}
