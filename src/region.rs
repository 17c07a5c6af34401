use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::error::ValidationError;

/// Domain every Spaces endpoint lives under
pub const ENDPOINT_DOMAIN: &str = "digitaloceanspaces.com";

/// Canonical Spaces region codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Sfo3,
    Fra1,
    Ams3,
    Nyc3,
    Sgp1,
}

/// Lower-cased alias -> canonical region
static ALIASES: LazyLock<HashMap<&'static str, Region>> = LazyLock::new(|| {
    HashMap::from([
        ("san francisco", Region::Sfo3),
        ("sfo3", Region::Sfo3),
        ("frankfurt", Region::Fra1),
        ("fra1", Region::Fra1),
        ("amsterdam", Region::Ams3),
        ("ams3", Region::Ams3),
        ("new york", Region::Nyc3),
        ("nyc3", Region::Nyc3),
        ("singapore", Region::Sgp1),
        ("sgp1", Region::Sgp1),
    ])
});

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Sfo3,
        Region::Fra1,
        Region::Ams3,
        Region::Nyc3,
        Region::Sgp1,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Region::Sfo3 => "sfo3",
            Region::Fra1 => "fra1",
            Region::Ams3 => "ams3",
            Region::Nyc3 => "nyc3",
            Region::Sgp1 => "sgp1",
        }
    }

    /// Resolve a city name or region code, ignoring case and surrounding whitespace
    pub fn lookup(alias: &str) -> Option<Region> {
        ALIASES.get(alias.trim().to_lowercase().as_str()).copied()
    }

    /// Like [`Region::lookup`], but reports the miss as a validation error
    pub fn resolve(alias: &str) -> Result<Region, ValidationError> {
        Self::lookup(alias).ok_or_else(|| ValidationError::UnknownRegion {
            region: alias.to_string(),
        })
    }

    pub fn endpoint(self) -> Endpoint {
        Endpoint {
            region: self,
            url: format!("https://{}.{}", self.code(), ENDPOINT_DOMAIN),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Signing context derived from a canonical region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub region: Region,
    pub url: String,
}
