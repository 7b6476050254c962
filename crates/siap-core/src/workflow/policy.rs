//! Status transition policy for the disposition workflow
//!
//! The table is a pure function of (current, requested) and is injected into
//! the workflow service, so callers can run either the historical permissive
//! behavior or the enforced edge set.

use crate::types::DispositionStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Any status may follow any other. Matches the historical behavior
    /// where out-of-order transitions were accepted.
    Permissive,
    /// Only the declared forward edges are allowed; rejected and completed
    /// are terminal.
    #[default]
    Enforced,
}

impl TransitionPolicy {
    pub fn allows(&self, from: DispositionStatus, to: DispositionStatus) -> bool {
        use DispositionStatus::*;

        match self {
            Self::Permissive => true,
            Self::Enforced => matches!(
                (from, to),
                (Pending, InReview)
                    | (Pending, Approved)
                    | (Pending, Rejected)
                    | (InReview, Approved)
                    | (InReview, Rejected)
                    | (Approved, Completed)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DispositionStatus::*;

    #[test]
    fn test_enforced_allows_declared_edges() {
        let policy = TransitionPolicy::Enforced;

        assert!(policy.allows(Pending, InReview));
        assert!(policy.allows(Pending, Approved));
        assert!(policy.allows(Pending, Rejected));
        assert!(policy.allows(InReview, Approved));
        assert!(policy.allows(InReview, Rejected));
        assert!(policy.allows(Approved, Completed));
    }

    #[test]
    fn test_enforced_rejects_everything_else() {
        let policy = TransitionPolicy::Enforced;

        // Terminal states have no outgoing edges
        for to in DispositionStatus::all() {
            assert!(!policy.allows(Rejected, to), "rejected -> {} allowed", to);
            assert!(!policy.allows(Completed, to), "completed -> {} allowed", to);
        }

        // No backwards or self edges
        assert!(!policy.allows(Approved, Pending));
        assert!(!policy.allows(InReview, Pending));
        assert!(!policy.allows(Pending, Pending));
        assert!(!policy.allows(Pending, Completed));
        assert!(!policy.allows(InReview, Completed));
    }

    #[test]
    fn test_permissive_allows_out_of_order() {
        let policy = TransitionPolicy::Permissive;

        assert!(policy.allows(Completed, Pending));
        assert!(policy.allows(Rejected, Approved));
        for from in DispositionStatus::all() {
            for to in DispositionStatus::all() {
                assert!(policy.allows(from, to));
            }
        }
    }

    #[test]
    fn test_default_is_enforced() {
        assert_eq!(TransitionPolicy::default(), TransitionPolicy::Enforced);
    }
}
