//! Fixed code → label lookup tables.
//!
//! Codes are matched exactly (after trimming). Anything not listed maps to
//! [`FALLBACK_LABEL`].

use crate::utils::constants::FALLBACK_LABEL;

pub fn lookup_country(code: &str) -> Option<&'static str> {
    match code.trim() {
        "USA" => Some("United States"),
        "USSR" => Some("Soviet Union"),
        "UK" => Some("United Kingdom"),
        "FRANCE" => Some("France"),
        "CHINA" => Some("China"),
        "INDIA" => Some("India"),
        _ => None,
    }
}

pub fn lookup_purpose(code: &str) -> Option<&'static str> {
    match code.trim() {
        "Combat" => Some("Combat"),
        "Wr" => Some("Weapons development"),
        "We" => Some("Weapons Evaluation"),
        "Fms" => Some("Soviet Phenomenon Study"),
        "Me" => Some("Military Exercise"),
        "Pne" => Some("Peaceful Nuclear Explosion"),
        "Sam" => Some("Soviet Emergency Test"),
        "Se" => Some("Safety Testing"),
        "Transp" => Some("Transportation purposes"),
        _ => None,
    }
}

pub fn lookup_type(code: &str) -> Option<&'static str> {
    match code.trim() {
        "Atmosph" => Some("Atmospheric"),
        "Airdrop" => Some("Airplane Deployed"),
        "Tower" => Some("Constructed Tower"),
        "Surface" => Some("Ground Level"),
        "UW" => Some("Underwater"),
        "Shaft" => Some("Underground Shaft"),
        "Tunnel" => Some("Underground Tunnel"),
        "Barge" => Some("Barge Platform"),
        "Balloon" => Some("Aerial Balloon"),
        "Rocket" => Some("Missile Launch"),
        "Ship" => Some("Naval Vessel"),
        "Crater" => Some("Surface Crater"),
        _ => None,
    }
}

pub fn country_label(code: &str) -> &'static str {
    lookup_country(code).unwrap_or(FALLBACK_LABEL)
}

pub fn purpose_label(code: &str) -> &'static str {
    lookup_purpose(code).unwrap_or(FALLBACK_LABEL)
}

pub fn type_label(code: &str) -> &'static str {
    lookup_type(code).unwrap_or(FALLBACK_LABEL)
}
