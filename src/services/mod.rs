pub mod api_client;
pub mod cleanup;
pub mod confirmation;

pub use api_client::{ApiClient, AuthorizedClient};
pub use cleanup::CleanupService;
pub use confirmation::{BookingApi, BookingConfirmer, ConfirmStrategy, ConfirmationReport, Reserver};
