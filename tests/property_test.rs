// tests/property_test.rs

//! Property-based tests for the game engine.
//!
//! These verify invariants that must hold regardless of input: tile
//! conservation, bookshelf gravity, reorder bijectivity and the documented
//! tie-break rule.

mod property {
    pub mod conservation_test;
    pub mod gravity_test;
    pub mod reorder_test;
    pub mod tiebreak_test;
}
