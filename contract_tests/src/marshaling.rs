//! End-to-end marshaling contract tests
//!
//! Population and serialization against real handle tables and address
//! spaces. Each test pins one externally observable behavior of the
//! translation engine.
