use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::models::seat::{seats_in_row, Seat, SeatId, ROW_COUNT};

/// Источник доступности мест для сеанса.
pub trait AvailabilityOracle: Send + Sync {
    fn is_available(&self, seat: &SeatId) -> bool;
}

/// Фиксированный набор занятых мест.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticExclusions {
    excluded: HashSet<SeatId>,
}

impl StaticExclusions {
    pub fn new(excluded: impl IntoIterator<Item = SeatId>) -> Self {
        Self { excluded: excluded.into_iter().collect() }
    }

    pub fn len(&self) -> usize {
        self.excluded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.excluded.is_empty()
    }
}

/// Места, занятые по умолчанию (без подключения к живой доступности).
pub const DEFAULT_EXCLUSIONS: &[(u32, u32)] = &[
    (1, 7),
    (1, 8),
    (2, 5),
    (2, 6),
    (4, 14),
    (4, 15),
    (6, 1),
    (7, 20),
    (7, 21),
    (7, 22),
    (9, 10),
    (11, 3),
    (12, 27),
    (12, 28),
    (14, 14),
    (16, 1),
];

impl StaticExclusions {
    pub fn defaults() -> Self {
        Self::new(
            DEFAULT_EXCLUSIONS
                .iter()
                .filter_map(|&(row, number)| SeatId::new(row, number).ok()),
        )
    }
}

impl AvailabilityOracle for StaticExclusions {
    fn is_available(&self, seat: &SeatId) -> bool {
        !self.excluded.contains(seat)
    }
}

/// Генерирует схему зала: ряд 1 на 15 мест, ряды 2..=16 по 28 мест.
pub fn generate_seats(oracle: &dyn AvailabilityOracle) -> Vec<Vec<Seat>> {
    (1..=ROW_COUNT)
        .map(|row| {
            (1..=seats_in_row(row))
                .filter_map(|number| SeatId::new(row, number).ok())
                .map(|id| Seat {
                    id,
                    row: id.row(),
                    number: id.number(),
                    is_available: oracle.is_available(&id),
                })
                .collect()
        })
        .collect()
}

/// Схема зала, посчитанная один раз при открытии экрана выбора мест.
#[derive(Debug, Clone, Serialize)]
pub struct SeatGrid {
    rows: Vec<Vec<Seat>>,
    #[serde(skip)]
    index: HashMap<SeatId, (usize, usize)>,
}

impl SeatGrid {
    pub fn new(oracle: &dyn AvailabilityOracle) -> Self {
        let rows = generate_seats(oracle);
        let index = rows
            .iter()
            .enumerate()
            .flat_map(|(r, seats)| seats.iter().enumerate().map(move |(n, seat)| (seat.id, (r, n))))
            .collect();
        Self { rows, index }
    }

    pub fn rows(&self) -> &[Vec<Seat>] {
        &self.rows
    }

    pub fn seat(&self, id: &SeatId) -> Option<&Seat> {
        self.index.get(id).map(|&(r, n)| &self.rows[r][n])
    }

    pub fn is_available(&self, id: &SeatId) -> bool {
        self.seat(id).is_some_and(|seat| seat.is_available)
    }

    pub fn total_seats(&self) -> usize {
        self.index.len()
    }

    pub fn available_count(&self) -> usize {
        self.rows.iter().flatten().filter(|seat| seat.is_available).count()
    }
}
