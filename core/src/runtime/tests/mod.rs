//! Tests for the runtime
//!
//! Organized by feature area

mod helpers;
