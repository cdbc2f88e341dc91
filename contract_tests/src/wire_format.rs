//! Wire format contract tests
//!
//! These tests pin the exact words a guest observes. If any of them fails,
//! the change is a protocol break, not a refactor.
