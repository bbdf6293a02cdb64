//! Architectural state tests.
