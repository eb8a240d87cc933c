// src/engine/phase.rs
use super::types::{Edge, Phase};
use crate::error::DecodeError;

/// Which part of the match the current rows belong to. Starts idle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseTracker {
    current: Option<Phase>,
}

impl PhaseTracker {
    pub fn current(&self) -> Option<Phase> {
        self.current
    }

    pub fn set(&mut self, phase: Option<Phase>) {
        self.current = phase;
    }

    pub fn require(&self) -> Result<Phase, DecodeError> {
        self.current.ok_or(DecodeError::NoPhase)
    }

    pub fn before_row(&mut self, edges: &[(&str, Edge)], label: &str) {
        for (l, e) in edges {
            if let (true, Edge::Before(p)) = (*l == label, e) {
                self.current = Some(*p);
            }
        }
    }

    pub fn after_row(&mut self, edges: &[(&str, Edge)], label: &str) {
        for (l, e) in edges {
            if let (true, Edge::After(p)) = (*l == label, e) {
                self.current = *p;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDGES: &[(&str, Edge)] = &[
        ("taxi", Edge::Before(Phase::Auto)),
        ("autonomous points", Edge::After(Some(Phase::Teleop))),
        ("teleop points", Edge::After(None)),
    ];

    #[test]
    fn walks_through_a_match() {
        let mut t = PhaseTracker::default();
        assert_eq!(t.require(), Err(DecodeError::NoPhase));

        t.before_row(EDGES, "taxi");
        assert_eq!(t.current(), Some(Phase::Auto));
        t.after_row(EDGES, "taxi");
        assert_eq!(t.current(), Some(Phase::Auto));

        t.before_row(EDGES, "autonomous points");
        assert_eq!(t.current(), Some(Phase::Auto));
        t.after_row(EDGES, "autonomous points");
        assert_eq!(t.require(), Ok(Phase::Teleop));

        t.after_row(EDGES, "teleop points");
        assert_eq!(t.current(), None);
    }
}
