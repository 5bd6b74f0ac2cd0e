// src/continent/classifier.rs
use petgraph::graph::NodeIndex;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

use crate::config::ContinentSettings;
use crate::continent::graph::AreaGraph;
use crate::records::AreaCatalog;

/// Результат классификации обычной зоны
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// Метка из таблицы ручных переопределений
    Override(String),
    /// Ближайший континент и глубина, на которой он найден
    Nearest { label: String, depth: usize },
    /// Ни один континент недостижим
    Unknown,
}

impl Assignment {
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Assignment::Override(label) | Assignment::Nearest { label, .. } => Some(label),
            Assignment::Unknown => None,
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("-"))
    }
}

/// Относит обычные зоны к ближайшему континенту по графу смежности
pub struct ContinentClassifier<'a> {
    graph: &'a AreaGraph,
    catalog: &'a AreaCatalog,
    settings: &'a ContinentSettings,
    cache: HashMap<String, Assignment>,
}

impl<'a> ContinentClassifier<'a> {
    #[must_use]
    pub fn new(
        graph: &'a AreaGraph,
        catalog: &'a AreaCatalog,
        settings: &'a ContinentSettings,
    ) -> Self {
        Self {
            graph,
            catalog,
            settings,
            cache: HashMap::new(),
        }
    }

    /// Классифицирует одну зону.
    ///
    /// 1. Ручное переопределение по названию (без учёта регистра) применяется сразу.
    /// 2. Иначе поиск в ширину собирает все континенты на минимальной глубине.
    /// 3. Из них выбирается самый приоритетный.
    ///
    /// Для континентов и неизвестных uid возвращает `None`.
    pub fn classify(&mut self, uid: &str) -> Option<Assignment> {
        if let Some(cached) = self.cache.get(uid) {
            return Some(cached.clone());
        }
        let (catalog, graph, settings) = (self.catalog, self.graph, self.settings);
        let area = catalog.get(uid)?;
        if area.is_continent() {
            return None;
        }

        let assignment = if let Some(label) = settings.override_for(&area.name) {
            Assignment::Override(label.to_string())
        } else {
            graph
                .node(uid)
                .and_then(|start| self.nearest_continents(start))
                .and_then(|(depth, labels)| {
                    self.pick_by_priority(&labels).map(|label| Assignment::Nearest {
                        label: label.to_string(),
                        depth,
                    })
                })
                .unwrap_or(Assignment::Unknown)
        };

        self.cache.insert(uid.to_string(), assignment.clone());
        Some(assignment)
    }

    /// Классифицирует все обычные зоны каталога
    pub fn classify_all(&mut self) -> BTreeMap<String, Assignment> {
        let catalog = self.catalog;
        catalog
            .regular()
            .filter_map(|area| {
                self.classify(&area.uid)
                    .map(|assignment| (area.uid.clone(), assignment))
            })
            .collect()
    }

    /// Ограниченный поиск в ширину.
    ///
    /// Как только найден континент на глубине `d`, узлы глубины `d` и глубже больше не
    /// раскрываются, но оставшиеся в очереди узлы глубины `d - 1` ещё обрабатываются,
    /// поэтому собираются все континенты минимальной глубины. Через континенты
    /// поиск не проходит.
    fn nearest_continents(&self, start: NodeIndex) -> Option<(usize, BTreeSet<&'a str>)> {
        let graph = self.graph;
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0usize)]);
        let mut found_depth: Option<usize> = None;
        let mut labels = BTreeSet::new();

        while let Some((node, depth)) = queue.pop_front() {
            if found_depth.is_some_and(|found| depth >= found) {
                continue;
            }
            for neighbor in graph.neighbors(node) {
                if !visited.insert(neighbor) {
                    continue;
                }
                match graph.continent_label(neighbor) {
                    Some(label) => {
                        found_depth.get_or_insert(depth + 1);
                        labels.insert(label);
                    }
                    None => queue.push_back((neighbor, depth + 1)),
                }
            }
        }

        found_depth.map(|depth| (depth, labels))
    }

    fn pick_by_priority<'l>(&self, labels: &BTreeSet<&'l str>) -> Option<&'l str> {
        labels
            .iter()
            .copied()
            .min_by_key(|label| (self.settings.rank(label), *label))
    }
}
