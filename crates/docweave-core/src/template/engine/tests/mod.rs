//! Tests for the expansion engines

use super::*;

// Shared fixtures
mod helpers;
