// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printgate — Platform print strategies.
//
// Each host OS gets one `PlatformStrategy` that owns its fallback chain, the
// command grammar of every mechanism in it, and its printer enumeration. All
// strategies compile on every target so the chains can be exercised anywhere;
// only the winspool FFI is Windows-specific.

pub mod macos;
pub mod probe;
pub mod stub;
pub mod traits;
pub mod windows;

#[cfg(target_os = "windows")]
mod winspool;

use std::sync::Arc;

use printgate_core::{AppConfig, HostOs};

pub use probe::{HostProbe, StaticProbe, SystemProbe};
pub use traits::{PlanContext, PlatformStrategy};

/// Build the strategy for the host this process runs on.
pub fn platform_strategy(config: &AppConfig) -> Arc<dyn PlatformStrategy> {
    strategy_for(HostOs::detect(), config, Arc::new(SystemProbe))
}

/// Build the strategy for an explicit host, with an injected probe.
pub fn strategy_for(
    host: HostOs,
    config: &AppConfig,
    probe: Arc<dyn HostProbe>,
) -> Arc<dyn PlatformStrategy> {
    tracing::info!(host = %host, "selecting platform print strategy");
    match host {
        HostOs::Windows => Arc::new(
            windows::WindowsStrategy::new(&config.silent_print_helper, probe)
                .require_printer(config.require_printer),
        ),
        HostOs::MacOs => Arc::new(macos::MacStrategy),
        HostOs::Other(name) => Arc::new(stub::UnsupportedStrategy::new(name)),
    }
}
