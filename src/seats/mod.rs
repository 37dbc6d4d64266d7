pub mod grid;
pub mod selection;

pub use grid::{generate_seats, AvailabilityOracle, SeatGrid, StaticExclusions};
pub use selection::{
    seat_label, BookingSummary, LabelStyle, SeatLabel, SeatSelection, SelectionPhase, ToggleOutcome,
};
