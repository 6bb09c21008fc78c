//! Static zone → table partition of the dining room
//!
//! TODO: move to a `zone` table once staff can edit the floor plan.

/// Fixed table numbers per named zone
pub const TABLES_BY_ZONE: &[(&str, &[i32])] = &[
    ("Terraza", &[1, 2, 3, 4, 5]),
    ("Salón Interior", &[6, 7, 8, 9, 10, 11]),
    ("Área Privada", &[12, 13, 14]),
    ("Zona Bar", &[15, 16, 17, 18]),
];

/// Candidate tables for a zone; unknown zone yields an empty set, no zone
/// yields the union of all zones
pub fn tables_for_zone(zone: Option<&str>) -> Vec<i32> {
    match zone {
        Some(name) => TABLES_BY_ZONE
            .iter()
            .find(|(zone_name, _)| *zone_name == name)
            .map(|(_, tables)| tables.to_vec())
            .unwrap_or_default(),
        None => TABLES_BY_ZONE
            .iter()
            .flat_map(|(_, tables)| tables.iter().copied())
            .collect(),
    }
}
