use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SelectionError;
use crate::models::SeatId;
use crate::seats::grid::SeatGrid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionPhase {
    #[default]
    Idle,
    HasSelection,
    Confirming,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ToggleOutcome {
    Added,
    Removed,
    Ignored,
}

/// Как подписывать место в итоговой сводке.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    /// Ряд и позиция из номера места по пять мест в ряду.
    #[default]
    Legacy,
    /// Настоящие ряд и номер из схемы зала.
    Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeatLabel {
    pub seat: SeatId,
    pub row: u32,
    pub position: u32,
}

impl fmt::Display for SeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}, Seat {}", self.row, self.position)
    }
}

pub fn seat_label(seat: SeatId, style: LabelStyle) -> SeatLabel {
    match style {
        LabelStyle::Legacy => {
            let n = seat.number();
            SeatLabel { seat, row: (n - 1) / 5 + 1, position: (n - 1) % 5 + 1 }
        }
        LabelStyle::Grid => SeatLabel { seat, row: seat.row(), position: seat.number() },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub seats: Vec<SeatId>,
    pub labels: Vec<SeatLabel>,
    pub unit_price: u64,
    pub total: u64,
}

/// Выбранные пользователем места и фаза оформления.
///
/// Порядок вставки сохраняется, дубликатов нет.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeatSelection {
    seats: Vec<SeatId>,
    phase: SelectionPhase,
}

impl SeatSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    pub fn seats(&self) -> &[SeatId] {
        &self.seats
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn contains(&self, seat: &SeatId) -> bool {
        self.seats.contains(seat)
    }

    /// Клик по месту. Недоступные места и клики во время оформления игнорируются.
    pub fn toggle_seat(&mut self, grid: &SeatGrid, seat: SeatId) -> ToggleOutcome {
        if !matches!(self.phase, SelectionPhase::Idle | SelectionPhase::HasSelection) {
            return ToggleOutcome::Ignored;
        }
        if !grid.is_available(&seat) {
            return ToggleOutcome::Ignored;
        }

        let outcome = match self.seats.iter().position(|s| *s == seat) {
            Some(pos) => {
                self.seats.remove(pos);
                ToggleOutcome::Removed
            }
            None => {
                self.seats.push(seat);
                ToggleOutcome::Added
            }
        };

        self.phase = if self.seats.is_empty() { SelectionPhase::Idle } else { SelectionPhase::HasSelection };
        outcome
    }

    /// Переход к сводке. Возвращает снимок выбора для подтверждения.
    pub fn continue_to_summary(&mut self) -> Result<Vec<SeatId>, SelectionError> {
        match self.phase {
            SelectionPhase::HasSelection | SelectionPhase::Confirming => {
                self.phase = SelectionPhase::Confirming;
                Ok(self.seats.clone())
            }
            SelectionPhase::Idle | SelectionPhase::Completed => Err(SelectionError::EmptySelection),
        }
    }

    /// Назад из сводки. Места на сервере не освобождаются.
    pub fn back(&mut self) -> bool {
        if self.phase != SelectionPhase::Confirming {
            return false;
        }
        self.phase = SelectionPhase::HasSelection;
        true
    }

    /// Бронь подтверждена.
    pub fn complete(&mut self) -> Result<(), SelectionError> {
        if self.phase != SelectionPhase::Confirming {
            return Err(SelectionError::NotConfirming);
        }
        self.seats.clear();
        self.phase = SelectionPhase::Completed;
        Ok(())
    }

    /// Уход со страницы.
    pub fn clear(&mut self) {
        self.seats.clear();
        self.phase = SelectionPhase::Idle;
    }

    pub fn total_price(&self, unit_price: u64) -> u64 {
        self.seats.len() as u64 * unit_price
    }

    pub fn summary(&self, unit_price: u64, style: LabelStyle) -> BookingSummary {
        BookingSummary {
            seats: self.seats.clone(),
            labels: self.seats.iter().map(|&seat| seat_label(seat, style)).collect(),
            unit_price,
            total: self.total_price(unit_price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seats::grid::StaticExclusions;
    use proptest::prelude::*;

    fn seat(s: &str) -> SeatId {
        s.parse().unwrap()
    }

    fn grid() -> SeatGrid {
        SeatGrid::new(&StaticExclusions::new([seat("2-5")]))
    }

    #[test]
    fn two_seats_at_twelve_cost_twenty_four() {
        let grid = grid();
        let mut selection = SeatSelection::new();
        selection.toggle_seat(&grid, seat("1-1"));
        selection.toggle_seat(&grid, seat("1-2"));
        assert_eq!(selection.seats(), &[seat("1-1"), seat("1-2")]);
        assert_eq!(selection.total_price(12), 24);
        assert_eq!(selection.phase(), SelectionPhase::HasSelection);
    }

    #[test]
    fn unavailable_seat_ignores_clicks() {
        let grid = grid();
        let mut selection = SeatSelection::new();
        selection.toggle_seat(&grid, seat("1-1"));
        let before = selection.clone();

        assert_eq!(selection.toggle_seat(&grid, seat("2-5")), ToggleOutcome::Ignored);
        assert_eq!(selection, before);
    }

    #[test]
    fn continue_needs_a_seat() {
        let grid = grid();
        let mut selection = SeatSelection::new();
        assert_eq!(selection.continue_to_summary(), Err(SelectionError::EmptySelection));
        assert_eq!(selection.phase(), SelectionPhase::Idle);

        selection.toggle_seat(&grid, seat("5-5"));
        selection.toggle_seat(&grid, seat("5-5"));
        assert_eq!(selection.phase(), SelectionPhase::Idle);
        assert!(selection.continue_to_summary().is_err());
    }

    #[test]
    fn back_keeps_selection_and_confirming_freezes_it() {
        let grid = grid();
        let mut selection = SeatSelection::new();
        selection.toggle_seat(&grid, seat("3-10"));
        selection.toggle_seat(&grid, seat("3-11"));

        let snapshot = selection.continue_to_summary().unwrap();
        assert_eq!(snapshot, vec![seat("3-10"), seat("3-11")]);
        assert_eq!(selection.phase(), SelectionPhase::Confirming);
        assert_eq!(selection.toggle_seat(&grid, seat("4-1")), ToggleOutcome::Ignored);

        assert!(selection.back());
        assert_eq!(selection.phase(), SelectionPhase::HasSelection);
        assert_eq!(selection.seats(), snapshot.as_slice());
        assert!(!selection.back());
    }

    #[test]
    fn complete_clears_selection() {
        let grid = grid();
        let mut selection = SeatSelection::new();
        assert_eq!(selection.complete(), Err(SelectionError::NotConfirming));

        selection.toggle_seat(&grid, seat("7-7"));
        selection.continue_to_summary().unwrap();
        selection.complete().unwrap();
        assert!(selection.is_empty());
        assert_eq!(selection.phase(), SelectionPhase::Completed);
        assert_eq!(selection.toggle_seat(&grid, seat("7-8")), ToggleOutcome::Ignored);
    }

    #[test]
    fn clear_returns_to_idle_from_any_phase() {
        let grid = grid();
        let mut selection = SeatSelection::new();
        selection.toggle_seat(&grid, seat("8-1"));
        selection.continue_to_summary().unwrap();
        selection.clear();
        assert!(selection.is_empty());
        assert_eq!(selection.phase(), SelectionPhase::Idle);
        assert_eq!(selection.toggle_seat(&grid, seat("8-2")), ToggleOutcome::Added);
    }

    #[test]
    fn legacy_labels_use_number_suffix() {
        assert_eq!(seat_label(seat("1-5"), LabelStyle::Legacy), SeatLabel { seat: seat("1-5"), row: 1, position: 5 });
        assert_eq!(seat_label(seat("1-6"), LabelStyle::Legacy), SeatLabel { seat: seat("1-6"), row: 2, position: 1 });
        assert_eq!(seat_label(seat("3-11"), LabelStyle::Legacy).to_string(), "Row 3, Seat 1");
        assert_eq!(seat_label(seat("3-11"), LabelStyle::Grid).to_string(), "Row 3, Seat 11");
    }

    #[test]
    fn summary_collects_labels_and_total() {
        let grid = grid();
        let mut selection = SeatSelection::new();
        selection.toggle_seat(&grid, seat("10-12"));
        let summary = selection.summary(12, LabelStyle::Grid);
        assert_eq!(summary.total, 12);
        assert_eq!(summary.labels[0].row, 10);
    }

    fn seat_strategy() -> impl Strategy<Value = SeatId> {
        (1u32..=16, 1u32..=28).prop_filter_map("seat outside hall", |(r, n)| SeatId::new(r, n).ok())
    }

    proptest! {
        #[test]
        fn toggling_twice_restores_selection(
            initial in proptest::collection::vec(seat_strategy(), 0..10),
            target in seat_strategy(),
        ) {
            let grid = grid();
            let mut selection = SeatSelection::new();
            for s in initial {
                if !selection.contains(&s) {
                    selection.toggle_seat(&grid, s);
                }
            }
            let before = selection.clone();
            selection.toggle_seat(&grid, target);
            selection.toggle_seat(&grid, target);
            // повторный клик возвращает место в конец; сравниваем как множества
            let mut after: Vec<SeatId> = selection.seats().to_vec();
            let mut expected: Vec<SeatId> = before.seats().to_vec();
            after.sort();
            expected.sort();
            prop_assert_eq!(after, expected);
            prop_assert_eq!(selection.phase(), before.phase());
        }
    }
}
