// src/layout/constraints.rs
use std::collections::HashMap;

use tracing::debug;

use crate::direction::{Direction, normalize};
use crate::records::{AreaCatalog, ExitRecord, RoomIndex};

/// Направленное ограничение: `to` лежит от `from` в сторону `direction`
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub from: String,
    pub to: String,
    pub direction: Direction,
}

impl Constraint {
    #[must_use]
    pub fn vector(&self) -> [f64; 3] {
        self.direction.vector()
    }
}

/// Счётчик направлений для одной упорядоченной пары зон.
/// Направления хранятся в порядке первого появления, чтобы ничьи решались стабильно.
#[derive(Debug)]
struct PairTally {
    from: String,
    to: String,
    counts: Vec<(Direction, u32)>,
}

impl PairTally {
    fn record(&mut self, direction: Direction) {
        match self.counts.iter_mut().find(|(d, _)| *d == direction) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((direction, 1)),
        }
    }

    /// Самое частое направление; при равенстве побеждает встреченное первым
    fn dominant(&self) -> Option<Direction> {
        let mut best: Option<(Direction, u32)> = None;
        for &(direction, count) in &self.counts {
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((direction, count));
            }
        }
        best.map(|(direction, _)| direction)
    }
}

/// Собирает по одному доминирующему ограничению на каждую пару зон.
///
/// Выход отбрасывается, если комнаты не привязаны к зонам, лежат в одной зоне,
/// зоны нет в каталоге или она континент, или направление не распознано.
/// На каждую пару выдаётся прямое ограничение и обратное ему.
#[must_use]
pub fn extract_constraints(
    exits: &[ExitRecord],
    rooms: &RoomIndex,
    catalog: &AreaCatalog,
) -> Vec<Constraint> {
    let mut tallies: Vec<PairTally> = Vec::new();
    let mut pair_index: HashMap<(String, String), usize> = HashMap::new();
    let mut dropped = 0usize;

    for exit in exits {
        let Some((from, to)) = rooms.area_pair(exit) else {
            dropped += 1;
            continue;
        };
        let (Some(from_area), Some(to_area)) = (catalog.get(from), catalog.get(to)) else {
            dropped += 1;
            continue;
        };
        if from_area.is_continent() || to_area.is_continent() {
            dropped += 1;
            continue;
        }
        let Some(direction) = normalize(exit.dir.as_deref()) else {
            dropped += 1;
            continue;
        };

        let key = (from.to_string(), to.to_string());
        let idx = *pair_index.entry(key).or_insert_with(|| {
            tallies.push(PairTally {
                from: from.to_string(),
                to: to.to_string(),
                counts: Vec::new(),
            });
            tallies.len() - 1
        });
        tallies[idx].record(direction);
    }

    let mut constraints = Vec::with_capacity(tallies.len() * 2);
    for tally in &tallies {
        let Some(direction) = tally.dominant() else {
            continue;
        };
        constraints.push(Constraint {
            from: tally.from.clone(),
            to: tally.to.clone(),
            direction,
        });
        constraints.push(Constraint {
            from: tally.to.clone(),
            to: tally.from.clone(),
            direction: direction.opposite(),
        });
    }

    debug!(
        pairs = tallies.len(),
        constraints = constraints.len(),
        dropped_exits = dropped,
        "Extracted directional constraints"
    );
    constraints
}
