//! Scan candidate, comparison and session types

use super::error::MemoryError;
use super::{Address, MemoryValue, ValueType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An address suspected to hold the value of interest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanCandidate {
    pub address: Address,
    /// Last observed value, refreshed by every narrowing step
    pub value: MemoryValue,
    pub value_type: ValueType,
}

impl ScanCandidate {
    /// Creates a new candidate; the type is taken from the value
    pub fn new(address: Address, value: MemoryValue) -> Self {
        ScanCandidate {
            address,
            value,
            value_type: value.value_type(),
        }
    }
}

/// Predicate used by scan and narrowing steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Comparison {
    Equal,
    NotEqual,
    Greater,
    Less,
    Changed,
    Unchanged,
}

impl Comparison {
    /// Checks if this comparison reads the user literal
    pub fn requires_literal(&self) -> bool {
        matches!(
            self,
            Comparison::Equal | Comparison::NotEqual | Comparison::Greater | Comparison::Less
        )
    }

    /// Checks if this comparison needs a previous observation
    pub fn requires_previous(&self) -> bool {
        matches!(self, Comparison::Changed | Comparison::Unchanged)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Comparison::Equal => "equal",
            Comparison::NotEqual => "notEqual",
            Comparison::Greater => "greater",
            Comparison::Less => "less",
            Comparison::Changed => "changed",
            Comparison::Unchanged => "unchanged",
        }
    }
}

impl FromStr for Comparison {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "equal" | "eq" | "exact" | "=" | "==" => Ok(Comparison::Equal),
            "notequal" | "ne" | "!=" => Ok(Comparison::NotEqual),
            "greater" | "gt" | ">" => Ok(Comparison::Greater),
            "less" | "lt" | "<" => Ok(Comparison::Less),
            "changed" => Ok(Comparison::Changed),
            "unchanged" => Ok(Comparison::Unchanged),
            _ => Err(MemoryError::InvalidComparison(s.to_string())),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a history entry came from a full pass or a narrowing pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    First,
    Narrow,
}

/// One entry of the scan history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanStep {
    pub kind: StepKind,
    pub literal: Option<f64>,
    pub value_type: ValueType,
    pub comparison: Comparison,
    pub results: usize,
    /// Set when the pass was interrupted before covering its whole range
    pub cancelled: bool,
}

/// Candidate set and history of an in-progress search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanSession {
    candidates: Vec<ScanCandidate>,
    history: Vec<ScanStep>,
    value_type: ValueType,
}

impl ScanSession {
    /// Creates an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Current candidates in insertion order
    pub fn candidates(&self) -> &[ScanCandidate] {
        &self.candidates
    }

    /// First `limit` candidates, for rendering
    pub fn preview(&self, limit: usize) -> &[ScanCandidate] {
        &self.candidates[..self.candidates.len().min(limit)]
    }

    pub fn history(&self) -> &[ScanStep] {
        &self.history
    }

    /// Type of the most recent first scan
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Clears candidates and history together
    pub fn reset(&mut self) {
        self.candidates.clear();
        self.history.clear();
    }

    /// Replaces the candidate set and records the step that produced it
    pub(crate) fn commit(&mut self, candidates: Vec<ScanCandidate>, step: ScanStep) {
        if step.kind == StepKind::First {
            self.value_type = step.value_type;
        }
        self.candidates = candidates;
        self.history.push(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(kind: StepKind, results: usize) -> ScanStep {
        ScanStep {
            kind,
            literal: Some(100.0),
            value_type: ValueType::U16,
            comparison: Comparison::Equal,
            results,
            cancelled: false,
        }
    }

    #[test]
    fn test_comparison_parsing() {
        assert_eq!("equal".parse::<Comparison>().unwrap(), Comparison::Equal);
        assert_eq!("notEqual".parse::<Comparison>().unwrap(), Comparison::NotEqual);
        assert_eq!("not_equal".parse::<Comparison>().unwrap(), Comparison::NotEqual);
        assert_eq!(">".parse::<Comparison>().unwrap(), Comparison::Greater);
        assert_eq!("Unchanged".parse::<Comparison>().unwrap(), Comparison::Unchanged);
        assert!("between".parse::<Comparison>().is_err());
    }

    #[test]
    fn test_comparison_requirements() {
        assert!(Comparison::Equal.requires_literal());
        assert!(!Comparison::Equal.requires_previous());
        assert!(Comparison::Changed.requires_previous());
        assert!(!Comparison::Unchanged.requires_literal());
    }

    #[test]
    fn test_session_commit_and_reset() {
        let mut session = ScanSession::new();
        assert!(session.is_empty());
        assert_eq!(session.value_type(), ValueType::I32);

        let candidates = vec![
            ScanCandidate::new(Address::new(0), MemoryValue::U16(100)),
            ScanCandidate::new(Address::new(2), MemoryValue::U16(100)),
        ];
        session.commit(candidates, step(StepKind::First, 2));
        assert_eq!(session.len(), 2);
        assert_eq!(session.value_type(), ValueType::U16);
        assert_eq!(session.preview(1).len(), 1);
        assert_eq!(session.preview(50).len(), 2);

        session.reset();
        assert!(session.is_empty());
        assert!(session.history().is_empty());
        session.reset();
        assert!(session.is_empty());
    }

    #[test]
    fn test_candidate_type_follows_value() {
        let candidate = ScanCandidate::new(Address::new(8), MemoryValue::F64(0.5));
        assert_eq!(candidate.value_type, ValueType::F64);
    }
}
