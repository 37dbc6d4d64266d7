pub mod hall;
pub mod movie;
pub mod schedule;
pub mod seat;
pub mod user;

pub use hall::Hall;
pub use movie::Movie;
pub use schedule::Schedule;
pub use seat::{Seat, SeatId};
pub use user::User;
