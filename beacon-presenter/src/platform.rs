//! Platform capability probing.
//!
//! The policy only ever sees a [`PlatformCapabilities`] value; how it was
//! derived from the host is the probe's business.

use beacon_core::PlatformCapabilities;

/// First host API level that refuses background starts of non-foreground services.
pub const FOREGROUND_START_MIN_API_LEVEL: u32 = 26;

/// First host API level that accepts alert category metadata.
pub const CATEGORY_METADATA_MIN_API_LEVEL: u32 = 21;

/// Read-only query evaluated at every decision.
pub trait CapabilityProbe: Send {
    fn capabilities(&self) -> PlatformCapabilities;
}

/// A fixed value is its own probe.
impl CapabilityProbe for PlatformCapabilities {
    fn capabilities(&self) -> PlatformCapabilities {
        *self
    }
}

/// Derives capabilities from the host's API level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiLevelProbe {
    pub api_level: u32,
}

impl ApiLevelProbe {
    pub fn new(api_level: u32) -> Self {
        Self { api_level }
    }
}

impl CapabilityProbe for ApiLevelProbe {
    fn capabilities(&self) -> PlatformCapabilities {
        PlatformCapabilities {
            requires_foreground_for_background_start: self.api_level
                >= FOREGROUND_START_MIN_API_LEVEL,
            supports_category_metadata: self.api_level >= CATEGORY_METADATA_MIN_API_LEVEL,
        }
    }
}
