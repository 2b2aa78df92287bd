
mod extract_tests;
mod selector_tests;

use crate::config::{HarvestConfig, Timing};

/// Configuration with every wait and pause zeroed
fn config() -> HarvestConfig {
    let mut config = HarvestConfig::new("cafes in vadodara");
    config.timing = Timing::immediate();
    config
}
