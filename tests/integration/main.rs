//! Integration test driver for `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises the sensor core against
//! mock pins and converters.  All tests run on the host (x86_64) with no
//! real hardware required.

mod mock_hw;
mod scenario_tests;
mod temperature_tests;
