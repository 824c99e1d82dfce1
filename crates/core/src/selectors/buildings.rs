//! Building selectors.

use super::{Counts, count_by, filter_by, find_by_id, search};
use crate::filter::Filter;
use crate::model::Building;
use crate::types::BuildingType;

pub fn building_by_id<'a>(buildings: &'a [Building], id: &str) -> Option<&'a Building> {
    find_by_id(buildings, id)
}

pub fn buildings_by_type<'a>(
    buildings: impl IntoIterator<Item = &'a Building>,
    building_type: &Filter<BuildingType>,
) -> Vec<&'a Building> {
    filter_by(buildings, building_type, |b| b.building_type.as_ref())
}

pub fn building_type_counts<'a>(
    buildings: impl IntoIterator<Item = &'a Building>,
) -> Counts<BuildingType> {
    count_by(buildings, |b| b.building_type)
}

fn building_search_fields(building: &Building) -> [Option<&str>; 3] {
    [
        building.name.as_deref(),
        building.location.as_deref(),
        building.address.as_deref(),
    ]
}

/// Search name, location and address.
pub fn search_buildings<'a>(
    buildings: impl IntoIterator<Item = &'a Building>,
    query: &str,
) -> Vec<&'a Building> {
    search(buildings, query, building_search_fields)
}
