//! Splitter selectors and port utilization.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{filter_by, find_by_id, percentage, search};
use crate::filter::Filter;
use crate::model::{Building, Splitter};
use crate::types::BuildingId;

pub fn splitter_by_id<'a>(splitters: &'a [Splitter], id: &str) -> Option<&'a Splitter> {
    find_by_id(splitters, id)
}

pub fn splitters_by_building<'a>(
    splitters: impl IntoIterator<Item = &'a Splitter>,
    building: &Filter<BuildingId>,
) -> Vec<&'a Splitter> {
    filter_by(splitters, building, |s| s.building_id.as_ref())
}

/// Splitters with at least one free port.
pub fn available_splitters<'a>(
    splitters: impl IntoIterator<Item = &'a Splitter>,
) -> Vec<&'a Splitter> {
    splitters
        .into_iter()
        .filter(|s| s.available_ports() > 0)
        .collect()
}

fn splitter_search_fields(splitter: &Splitter) -> [Option<&str>; 1] {
    [splitter.splitter_number.as_deref()]
}

pub fn search_splitters<'a>(
    splitters: impl IntoIterator<Item = &'a Splitter>,
    query: &str,
) -> Vec<&'a Splitter> {
    search(splitters, query, splitter_search_fields)
}

/// A splitter joined with its building.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitterWithBuilding<'a> {
    pub splitter: &'a Splitter,
    pub building: Option<&'a Building>,
    pub used_ports: u32,
    pub available_ports: u32,
}

/// Join one splitter with its building. `None` when the splitter is unknown.
pub fn splitter_with_building<'a>(
    splitters: &'a [Splitter],
    buildings: &'a [Building],
    splitter_id: &str,
) -> Option<SplitterWithBuilding<'a>> {
    let splitter = find_by_id(splitters, splitter_id)?;
    Some(SplitterWithBuilding {
        splitter,
        building: splitter
            .building_id
            .as_ref()
            .and_then(|id| find_by_id(buildings, id)),
        used_ports: splitter.used_ports(),
        available_ports: splitter.available_ports(),
    })
}

/// Port totals for the splitters of one building.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingUtilization {
    pub splitters: usize,
    pub total_ports: u64,
    pub used_ports: u64,
    pub available_ports: u64,
    /// `used_ports / total_ports * 100`, `0` with no ports.
    pub utilization: f64,
}

/// Port utilization per building, keyed by building ID.
///
/// Splitters without a building are skipped.
pub fn splitter_utilization_by_building<'a>(
    splitters: impl IntoIterator<Item = &'a Splitter>,
) -> BTreeMap<BuildingId, BuildingUtilization> {
    let mut by_building: BTreeMap<BuildingId, BuildingUtilization> = BTreeMap::new();
    for splitter in splitters {
        let Some(building_id) = splitter.building_id.as_ref() else {
            continue;
        };
        let entry = by_building.entry(building_id.clone()).or_default();
        entry.splitters += 1;
        entry.total_ports += u64::from(splitter.port_count());
        entry.used_ports += u64::from(splitter.used_ports());
        entry.available_ports += u64::from(splitter.available_ports());
    }
    for entry in by_building.values_mut() {
        entry.utilization = percentage(
            usize::try_from(entry.used_ports).unwrap_or(usize::MAX),
            usize::try_from(entry.total_ports).unwrap_or(usize::MAX),
        );
    }
    by_building
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::PortUsage;

    fn splitter(id: &str, building: Option<&str>, port_count: u32, used: &[u32]) -> Splitter {
        Splitter {
            id: id.into(),
            splitter_number: Some(format!("SPL-{id}")),
            building_id: building.map(BuildingId::from),
            port_count: Some(port_count),
            ports: used
                .iter()
                .map(|p| {
                    (
                        *p,
                        PortUsage {
                            is_used: true,
                            service_id: None,
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_utilization_zero_ports_is_zero() {
        let splitters = vec![splitter("1", Some("b1"), 0, &[])];
        let utilization = splitter_utilization_by_building(&splitters);
        let b1 = utilization.get(&BuildingId::new("b1")).unwrap();
        assert_eq!(b1.total_ports, 0);
        assert!(b1.utilization.abs() < f64::EPSILON);
        assert!(b1.utilization.is_finite());
    }

    #[test]
    fn test_utilization_sums_per_building() {
        let splitters = vec![
            splitter("1", Some("b1"), 8, &[1, 2]),
            splitter("2", Some("b1"), 8, &[1, 2, 3, 4, 5, 6]),
            splitter("3", Some("b2"), 4, &[1]),
            splitter("4", None, 16, &[1]),
        ];
        let utilization = splitter_utilization_by_building(&splitters);
        assert_eq!(utilization.len(), 2);
        let b1 = &utilization[&BuildingId::new("b1")];
        assert_eq!(b1.splitters, 2);
        assert_eq!(b1.used_ports, 8);
        assert_eq!(b1.used_ports + b1.available_ports, b1.total_ports);
        assert!((b1.utilization - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_available_splitters() {
        let splitters = vec![
            splitter("full", None, 2, &[1, 2]),
            splitter("free", None, 2, &[1]),
        ];
        let available = available_splitters(&splitters);
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id.as_str(), "free");
    }

    #[test]
    fn test_splitter_with_building() {
        let buildings = vec![Building {
            id: "b1".into(),
            ..Building::default()
        }];
        let splitters = vec![splitter("1", Some("b1"), 4, &[2])];
        let joined = splitter_with_building(&splitters, &buildings, "1").unwrap();
        assert!(joined.building.is_some());
        assert_eq!(joined.used_ports, 1);
        assert_eq!(joined.available_ports, 3);
        assert!(splitter_with_building(&splitters, &buildings, "2").is_none());
        assert!(splitter_by_id(&splitters, "1").is_some());
    }

    #[test]
    fn test_splitters_by_building_and_search() {
        let splitters = vec![
            splitter("1", Some("b1"), 4, &[]),
            splitter("2", Some("b2"), 4, &[]),
        ];
        let b1 = splitters_by_building(&splitters, &Filter::One(BuildingId::new("b1")));
        assert_eq!(b1.len(), 1);
        assert_eq!(search_splitters(&splitters, "spl-2").len(), 1);
    }
}
