//! Property-based tests for merge and validation invariants

mod merge_invariants;
