//! Test suites for the Spindle daemon.

mod support;
mod unit;
