// src/continent/overlap.rs
use std::collections::BTreeSet;

use crate::continent::graph::AreaGraph;
use crate::records::AreaCatalog;

/// Обычная зона, напрямую граничащая с несколькими континентами
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlap {
    pub uid: String,
    pub name: String,
    /// Метки континентов в алфавитном порядке
    pub continents: Vec<String>,
}

/// Находит обычные зоны, у которых прямые соседи принадлежат двум и более континентам.
///
/// На классификацию не влияет. Результат отсортирован по названию зоны, затем по uid.
#[must_use]
pub fn find_overlaps(graph: &AreaGraph, catalog: &AreaCatalog) -> Vec<Overlap> {
    let mut overlaps: Vec<Overlap> = catalog
        .regular()
        .filter_map(|area| {
            let node = graph.node(&area.uid)?;
            let continents: BTreeSet<&str> = graph
                .neighbors(node)
                .into_iter()
                .filter_map(|neighbor| graph.continent_label(neighbor))
                .collect();
            (continents.len() > 1).then(|| Overlap {
                uid: area.uid.clone(),
                name: area.name.clone(),
                continents: continents.into_iter().map(String::from).collect(),
            })
        })
        .collect();
    overlaps.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.uid.cmp(&b.uid)));
    overlaps
}
