// src/direction.rs
//! Нормализация направлений выходов.
//!
//! Текстовая подсказка из записи выхода ("north", "n", "climb up the ladder") сводится
//! к одному из шести канонических направлений. Отсутствие направления является нормальным исходом,
//! а не ошибка.

use std::fmt;

/// Каноническое направление в трёхмерной сетке
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Up,
    Down,
}

/// Ключевые слова для поиска подстрокой. Порядок важен: побеждает первое совпадение.
const KEYWORDS: [(&str, Direction); 6] = [
    ("north", Direction::North),
    ("south", Direction::South),
    ("east", Direction::East),
    ("west", Direction::West),
    ("up", Direction::Up),
    ("down", Direction::Down),
];

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Up,
        Direction::Down,
    ];

    /// Однобуквенный код направления (`n`, `s`, `e`, `w`, `u`, `d`)
    #[must_use]
    pub fn code(self) -> char {
        match self {
            Direction::North => 'n',
            Direction::South => 's',
            Direction::East => 'e',
            Direction::West => 'w',
            Direction::Up => 'u',
            Direction::Down => 'd',
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "n" => Some(Direction::North),
            "s" => Some(Direction::South),
            "e" => Some(Direction::East),
            "w" => Some(Direction::West),
            "u" => Some(Direction::Up),
            "d" => Some(Direction::Down),
            _ => None,
        }
    }

    /// Единичный вектор: север = +Y, восток = +X, верх = +Z.
    #[must_use]
    pub fn vector(self) -> [f64; 3] {
        match self {
            Direction::North => [0.0, 1.0, 0.0],
            Direction::South => [0.0, -1.0, 0.0],
            Direction::East => [1.0, 0.0, 0.0],
            Direction::West => [-1.0, 0.0, 0.0],
            Direction::Up => [0.0, 0.0, 1.0],
            Direction::Down => [0.0, 0.0, -1.0],
        }
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Приводит произвольный текст к каноническому направлению.
///
/// Порядок проверок:
/// 1. точное совпадение с однобуквенным кодом (без учёта регистра);
/// 2. поиск ключевого слова подстрокой (`north`, `south`, `east`, `west`, `up`, `down`);
/// 3. разбиение на слова по небуквенным символам и поиск слова-кода.
///
/// Возвращает `None`, если направление распознать не удалось.
///
/// # Примеры
/// ```
/// use areamap::direction::{Direction, normalize};
/// assert_eq!(normalize(Some("NORTH")), Some(Direction::North));
/// assert_eq!(normalize(Some("n")), Some(Direction::North));
/// assert_eq!(normalize(Some("portal")), None);
/// ```
#[must_use]
pub fn normalize(raw: Option<&str>) -> Option<Direction> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }
    let text = raw.to_lowercase();

    if let Some(direction) = Direction::from_code(&text) {
        return Some(direction);
    }

    if let Some(&(_, direction)) = KEYWORDS.iter().find(|(keyword, _)| text.contains(keyword)) {
        return Some(direction);
    }

    text.split(|c: char| !c.is_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .find_map(Direction::from_code)
}
