// src/layout/solver.rs
use std::collections::{BTreeMap, HashMap};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LayoutSettings;
use crate::layout::constraints::Constraint;

/// Позиция зоны в мировых координатах (z — высота)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Смещение на `vector * scale`
    #[must_use]
    pub fn offset(self, vector: [f64; 3], scale: f64) -> Self {
        Self {
            x: self.x + vector[0] * scale,
            y: self.y + vector[1] * scale,
            z: self.z + vector[2] * scale,
        }
    }
}

/// Позиции всех обычных зон в порядке их появления во входных данных
#[derive(Debug, Clone, Default)]
pub struct Layout {
    ids: Vec<String>,
    positions: Vec<Position>,
    index: HashMap<String, usize>,
}

impl Layout {
    #[must_use]
    pub fn get(&self, uid: &str) -> Option<Position> {
        self.index.get(uid).map(|&idx| self.positions[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Position)> {
        self.ids
            .iter()
            .map(String::as_str)
            .zip(self.positions.iter().copied())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Полное отображение uid → позиция с отсортированными ключами
    #[must_use]
    pub fn to_sorted_map(&self) -> BTreeMap<String, Position> {
        self.iter()
            .map(|(uid, pos)| (uid.to_string(), pos))
            .collect()
    }
}

/// Начальные позиции: сохранённые ранее или начало координат.
pub fn seed_positions<'a>(
    area_ids: impl IntoIterator<Item = &'a str>,
    saved: &HashMap<String, Position>,
) -> Layout {
    let mut layout = Layout::default();
    for uid in area_ids {
        if layout.index.contains_key(uid) {
            continue;
        }
        layout.index.insert(uid.to_string(), layout.ids.len());
        layout.ids.push(uid.to_string());
        layout
            .positions
            .push(saved.get(uid).copied().unwrap_or_default());
    }
    layout
}

/// Сумма предложенных позиций для одной зоны за итерацию
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: [f64; 3],
    count: u32,
}

impl Accumulator {
    fn add(&mut self, target: Position) {
        self.sum[0] += target.x;
        self.sum[1] += target.y;
        self.sum[2] += target.z;
        self.count += 1;
    }

    /// Смешивает текущую позицию со средним предложенных.
    /// Без вкладов позиция не меняется.
    fn blend_into(self, current: Position, blend: f64) -> Position {
        if self.count == 0 {
            return current;
        }
        let n = f64::from(self.count);
        let keep = 1.0 - blend;
        Position {
            x: current.x * keep + self.sum[0] / n * blend,
            y: current.y * keep + self.sum[1] / n * blend,
            z: current.z * keep + self.sum[2] / n * blend,
        }
    }
}

#[cfg(feature = "parallel")]
fn blend_step(current: &[Position], sums: &[Accumulator], blend: f64) -> Vec<Position> {
    current
        .par_iter()
        .zip(sums.par_iter())
        .map(|(&pos, acc)| acc.blend_into(pos, blend))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn blend_step(current: &[Position], sums: &[Accumulator], blend: f64) -> Vec<Position> {
    current
        .iter()
        .zip(sums.iter())
        .map(|(&pos, acc)| acc.blend_into(pos, blend))
        .collect()
}

/// Итеративная релаксация позиций (синхронное обновление по Якоби).
///
/// На каждой итерации каждое ограничение `(from, to, v)` предлагает для `to` позицию
/// `pos[from] + v * grid_spacing`. Все предложения считаются по состоянию предыдущей
/// итерации и только потом применяются. После всех итераций раскладка центрируется
/// по X и Y; высота Z не нормализуется.
///
/// Ограничения со ссылками на зоны вне раскладки игнорируются.
pub fn relax_positions(layout: &mut Layout, constraints: &[Constraint], settings: &LayoutSettings) {
    let edges: Vec<(usize, usize, [f64; 3])> = constraints
        .iter()
        .filter_map(|c| {
            let from = *layout.index.get(&c.from)?;
            let to = *layout.index.get(&c.to)?;
            Some((from, to, c.vector()))
        })
        .collect();

    let mut sums = vec![Accumulator::default(); layout.len()];
    for _ in 0..settings.iterations {
        sums.fill(Accumulator::default());
        for &(from, to, vector) in &edges {
            let target = layout.positions[from].offset(vector, settings.grid_spacing);
            sums[to].add(target);
        }
        layout.positions = blend_step(&layout.positions, &sums, settings.blend);
    }

    recenter(&mut layout.positions);
    debug!(
        areas = layout.len(),
        constraints = edges.len(),
        iterations = settings.iterations,
        "Relaxed area positions"
    );
}

/// Сдвигает раскладку так, чтобы средние X и Y были нулевыми
fn recenter(positions: &mut [Position]) {
    if positions.is_empty() {
        return;
    }
    let n = positions.len() as f64;
    let mean_x = positions.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = positions.iter().map(|p| p.y).sum::<f64>() / n;
    for pos in positions {
        pos.x -= mean_x;
        pos.y -= mean_y;
    }
}
