//! Material stock selectors.

use rust_decimal::Decimal;

use super::{Counts, count_by, filter_by, find_by_id, search};
use crate::filter::Filter;
use crate::model::Material;
use crate::types::StockState;

pub fn material_by_id<'a>(materials: &'a [Material], id: &str) -> Option<&'a Material> {
    find_by_id(materials, id)
}

/// Look up a material by SAP code, ignoring ASCII case and surrounding
/// whitespace.
pub fn material_by_sap_code<'a>(materials: &'a [Material], sap_code: &str) -> Option<&'a Material> {
    let wanted = sap_code.trim();
    materials
        .iter()
        .find(|m| m.sap_code.as_deref().is_some_and(|c| c.trim().eq_ignore_ascii_case(wanted)))
}

pub fn materials_by_type<'a>(
    materials: impl IntoIterator<Item = &'a Material>,
    material_type: &Filter<String>,
) -> Vec<&'a Material> {
    filter_by(materials, material_type, |m| m.material_type.as_ref())
}

pub fn materials_by_stock_state<'a>(
    materials: impl IntoIterator<Item = &'a Material>,
    state: &Filter<StockState>,
) -> Vec<&'a Material> {
    if state.is_noop() {
        return materials.into_iter().collect();
    }
    materials
        .into_iter()
        .filter(|m| state.matches(&m.stock_state()))
        .collect()
}

pub fn low_stock_materials<'a>(
    materials: impl IntoIterator<Item = &'a Material>,
) -> Vec<&'a Material> {
    materials_by_stock_state(materials, &Filter::One(StockState::LowStock))
}

pub fn out_of_stock_materials<'a>(
    materials: impl IntoIterator<Item = &'a Material>,
) -> Vec<&'a Material> {
    materials_by_stock_state(materials, &Filter::One(StockState::OutOfStock))
}

pub fn in_stock_materials<'a>(
    materials: impl IntoIterator<Item = &'a Material>,
) -> Vec<&'a Material> {
    materials_by_stock_state(materials, &Filter::One(StockState::InStock))
}

/// Counts per stock state. Every material lands in exactly one bucket.
pub fn material_stock_counts<'a>(
    materials: impl IntoIterator<Item = &'a Material>,
) -> Counts<StockState> {
    count_by(materials, |m| Some(m.stock_state()))
}

fn material_search_fields(material: &Material) -> [Option<&str>; 3] {
    [
        material.sap_code.as_deref(),
        material.description.as_deref(),
        material.material_type.as_deref(),
    ]
}

/// Search SAP code, description and material type.
pub fn search_materials<'a>(
    materials: impl IntoIterator<Item = &'a Material>,
    query: &str,
) -> Vec<&'a Material> {
    search(materials, query, material_search_fields)
}

/// Value of stock on hand: `quantity * unit_price` over priced materials
/// with positive stock.
pub fn inventory_value<'a>(materials: impl IntoIterator<Item = &'a Material>) -> Decimal {
    materials
        .into_iter()
        .filter(|m| m.stock_keeping_unit > Decimal::ZERO)
        .filter_map(|m| {
            m.unit_price
                .and_then(|price| price.checked_mul(m.stock_keeping_unit))
        })
        .fold(Decimal::ZERO, |acc, value| {
            acc.checked_add(value).unwrap_or(acc)
        })
}
