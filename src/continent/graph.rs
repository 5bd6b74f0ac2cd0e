// src/continent/graph.rs
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{HashMap, HashSet};

use crate::records::{AreaCatalog, ExitRecord, RoomIndex};

/// Неориентированный граф смежности зон.
///
/// Узлы — все известные зоны; континенты остаются узлами-терминалами с меткой.
/// Ребро добавляется для каждой пары различных зон, связанных хотя бы одним выходом.
/// Выходы между двумя континентами не учитываются.
#[derive(Debug, Clone, Default)]
pub struct AreaGraph {
    graph: UnGraph<String, ()>,
    nodes: HashMap<String, NodeIndex>,
    /// Метка континента для узлов-континентов
    labels: HashMap<NodeIndex, String>,
}

impl AreaGraph {
    #[must_use]
    pub fn build(exits: &[ExitRecord], rooms: &RoomIndex, catalog: &AreaCatalog) -> Self {
        let mut area_graph = Self::default();
        for area in catalog.iter() {
            let node = area_graph.graph.add_node(area.uid.clone());
            area_graph.nodes.insert(area.uid.clone(), node);
            if let Some(label) = &area.continent {
                area_graph.labels.insert(node, label.clone());
            }
        }

        let mut edges = HashSet::new();
        for exit in exits {
            let Some((from, to)) = rooms.area_pair(exit) else {
                continue;
            };
            let (Some(&a), Some(&b)) = (area_graph.nodes.get(from), area_graph.nodes.get(to))
            else {
                continue;
            };
            if area_graph.labels.contains_key(&a) && area_graph.labels.contains_key(&b) {
                continue;
            }
            let key = if a < b { (a, b) } else { (b, a) };
            if edges.insert(key) {
                area_graph.graph.add_edge(a, b, ());
            }
        }
        area_graph
    }

    #[must_use]
    pub fn node(&self, uid: &str) -> Option<NodeIndex> {
        self.nodes.get(uid).copied()
    }

    #[must_use]
    pub fn uid(&self, node: NodeIndex) -> &str {
        &self.graph[node]
    }

    /// Метка континента, если узел — континент
    #[must_use]
    pub fn continent_label(&self, node: NodeIndex) -> Option<&str> {
        self.labels.get(&node).map(String::as_str)
    }

    /// Соседи узла, отсортированные по uid (порядок обхода не зависит от порядка рёбер)
    #[must_use]
    pub fn neighbors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors(node).collect();
        neighbors.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
        neighbors
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
