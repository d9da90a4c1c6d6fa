//! Shared test harness modules for the SafeRoute CLI.

use super::*;

mod helpers;
mod route_unit;
