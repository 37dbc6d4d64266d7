use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::SeatIdError;

/// Количество рядов в зале.
pub const ROW_COUNT: u32 = 16;
/// Первый ряд короче остальных.
pub const FIRST_ROW_SEATS: u32 = 15;
pub const ROW_SEATS: u32 = 28;

/// Сколько мест в ряду `row` (0 для несуществующего ряда).
pub fn seats_in_row(row: u32) -> u32 {
    match row {
        1 => FIRST_ROW_SEATS,
        2..=ROW_COUNT => ROW_SEATS,
        _ => 0,
    }
}

/// Идентификатор места в формате `"{row}-{number}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatId {
    row: u32,
    number: u32,
}

impl SeatId {
    pub fn new(row: u32, number: u32) -> Result<Self, SeatIdError> {
        if number == 0 || number > seats_in_row(row) {
            return Err(SeatIdError::OutOfRange { row, number });
        }
        Ok(Self { row, number })
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    /// Числовой суффикс идентификатора.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Ключ записи о брони в локальном хранилище.
    pub fn storage_key(&self) -> String {
        format!("booking_{}", self)
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.number)
    }
}

impl FromStr for SeatId {
    type Err = SeatIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SeatIdError::Malformed(s.to_string());
        let (row, number) = s.split_once('-').ok_or_else(malformed)?;
        let row: u32 = row.trim().parse().map_err(|_| malformed())?;
        let number: u32 = number.trim().parse().map_err(|_| malformed())?;
        SeatId::new(row, number)
    }
}

impl Serialize for SeatId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeatId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: SeatId,
    pub row: u32,
    pub number: u32,
    pub is_available: bool,
}
