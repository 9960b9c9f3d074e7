//! Test suites for the lifecycle core and its Unix binding.

mod support;
