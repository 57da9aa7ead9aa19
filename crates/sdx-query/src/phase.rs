//! Query phases.

use serde::{Deserialize, Serialize};

/// What a phase does with its inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Map,
    Reduce,
    Link,
}

/// One stage of a multi-stage query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub kind: PhaseKind,
    /// Function (or link spec) the phase runs, opaque to the client.
    pub function: String,
    /// Whether this phase's output is part of the final report.
    pub keep: bool,
}

impl Phase {
    pub fn new(kind: PhaseKind, function: impl Into<String>) -> Self {
        Self {
            kind,
            function: function.into(),
            keep: false,
        }
    }

    pub fn map(function: impl Into<String>) -> Self {
        Self::new(PhaseKind::Map, function)
    }

    pub fn reduce(function: impl Into<String>) -> Self {
        Self::new(PhaseKind::Reduce, function)
    }

    pub fn link(spec: impl Into<String>) -> Self {
        Self::new(PhaseKind::Link, spec)
    }

    pub fn keep(mut self, keep: bool) -> Self {
        self.keep = keep;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_builders() {
        let phase = Phase::reduce("sum").keep(true);
        assert_eq!(phase.kind, PhaseKind::Reduce);
        assert_eq!(phase.function, "sum");
        assert!(phase.keep);
        assert!(!Phase::map("identity").keep);
    }

    #[test]
    fn test_phase_kind_serializes_lowercase() {
        let json = serde_json::to_string(&Phase::link("_").keep(true)).unwrap();
        assert_eq!(json, r#"{"kind":"link","function":"_","keep":true}"#);
    }
}
