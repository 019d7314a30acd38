//! Static body catalog, embedded as JSON and parsed once at startup.
//!
//! Distances are in render units from the body's parent (0 for the star).
//! Speeds are radians per tick at multiplier 1.0. Tilt is in degrees.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Embedded catalog data.
const BODIES_JSON: &str = include_str!("../data/bodies.json");

/// Color used when a catalog entry has a missing or malformed hex color.
const FALLBACK_COLOR: u32 = 0x999999;

/// Raw JSON body record.
#[derive(Debug, Deserialize)]
pub struct RawBody {
    pub key: String,
    pub name: String,
    pub radius: f32,
    pub distance: f32,
    pub rotation_speed: f32,
    pub orbital_speed: f32,
    #[serde(default)]
    pub tilt: f32,
    #[serde(rename = "color-hex")]
    pub color_hex: Option<String>,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub earth_view_scale: Option<f32>,
    #[serde(default)]
    pub has_satellite: bool,
    #[serde(default)]
    pub has_ring: bool,
    #[serde(default)]
    pub orbits: Option<String>,
}

/// Root structure for the JSON file.
#[derive(Debug, Deserialize)]
pub struct CatalogJSON {
    pub bodies: Vec<RawBody>,
}

/// One validated catalog entry. Immutable after load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyData {
    pub key: String,
    pub name: String,
    pub radius: f32,
    pub distance: f32,
    pub rotation_speed: f32,
    pub orbital_speed: f32,
    /// Axial tilt in degrees.
    pub tilt: f32,
    /// Packed 0xRRGGBB.
    pub color: u32,
    pub details: String,
    /// Visual-only scale used in ground-observer mode.
    pub earth_view_scale: Option<f32>,
    pub has_satellite: bool,
    pub has_ring: bool,
    /// Key of the body this one orbits; None for bodies orbiting the star.
    pub orbits: Option<String>,
}

impl BodyData {
    pub fn tilt_radians(&self) -> f32 {
        self.tilt.to_radians()
    }

    pub fn is_satellite(&self) -> bool {
        self.orbits.is_some()
    }

    fn is_star_candidate(&self) -> bool {
        self.orbits.is_none() && self.distance == 0.0
    }
}

/// Parse a hex color string like "ffcc00" or "#FFCC00".
fn parse_hex_color(hex: Option<&str>) -> u32 {
    hex.map(|h| h.trim_start_matches('#'))
        .filter(|h| h.len() == 6)
        .and_then(|h| u32::from_str_radix(h, 16).ok())
        .unwrap_or(FALLBACK_COLOR)
}

/// Validated catalog with key lookup.
#[derive(Debug, Clone)]
pub struct Catalog {
    bodies: Vec<BodyData>,
    by_key: HashMap<String, usize>,
    star: usize,
}

impl Catalog {
    /// Load the catalog from embedded JSON.
    pub fn load() -> Result<Self, CatalogError> {
        Self::from_json(BODIES_JSON)
    }

    /// Parse and validate a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: CatalogJSON = serde_json::from_str(json)?;

        let mut bodies = Vec::with_capacity(raw.bodies.len());
        let mut by_key = HashMap::new();
        let mut star: Option<usize> = None;

        for raw_body in raw.bodies {
            if !(raw_body.radius.is_finite() && raw_body.radius > 0.0) {
                return Err(CatalogError::InvalidRadius(raw_body.key));
            }
            if by_key.contains_key(&raw_body.key) {
                return Err(CatalogError::DuplicateKey(raw_body.key));
            }

            let data = BodyData {
                color: parse_hex_color(raw_body.color_hex.as_deref()),
                key: raw_body.key,
                name: raw_body.name,
                radius: raw_body.radius,
                distance: raw_body.distance,
                rotation_speed: raw_body.rotation_speed,
                orbital_speed: raw_body.orbital_speed,
                tilt: raw_body.tilt,
                details: raw_body.details,
                earth_view_scale: raw_body.earth_view_scale,
                has_satellite: raw_body.has_satellite,
                has_ring: raw_body.has_ring,
                orbits: raw_body.orbits,
            };

            let idx = bodies.len();
            if data.is_star_candidate() {
                if let Some(first) = star {
                    let first: &BodyData = &bodies[first];
                    return Err(CatalogError::MultipleStars {
                        first: first.key.clone(),
                        second: data.key,
                    });
                }
                star = Some(idx);
            } else if !(data.distance.is_finite() && data.distance > 0.0) {
                return Err(CatalogError::InvalidDistance(data.key));
            }
            by_key.insert(data.key.clone(), idx);
            bodies.push(data);
        }

        let star = star.ok_or(CatalogError::NoStar)?;

        for body in &bodies {
            let Some(parent_key) = &body.orbits else { continue };
            let parent = by_key
                .get(parent_key)
                .map(|&i| &bodies[i])
                .ok_or_else(|| CatalogError::UnknownParent {
                    body: body.key.clone(),
                    parent: parent_key.clone(),
                })?;
            if parent.is_satellite() {
                return Err(CatalogError::NestedSatellite {
                    body: body.key.clone(),
                    parent: parent_key.clone(),
                });
            }
        }

        log::debug!("catalog: {} bodies, star '{}'", bodies.len(), bodies[star].key);
        Ok(Self { bodies, by_key, star })
    }

    pub fn bodies(&self) -> &[BodyData] {
        &self.bodies
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    pub fn star_index(&self) -> usize {
        self.star
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// The catalog as JSON for the UI (names, details, colors), in index order.
    pub fn to_ui_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.bodies)
    }
}
