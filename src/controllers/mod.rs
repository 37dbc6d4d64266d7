#[cfg(feature = "admin")]
pub mod admin;
pub mod auth;
pub mod sessions;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    let router = Router::new()
        .merge(auth::routes())
        .merge(sessions::routes());

    #[cfg(feature = "admin")]
    let router = router.merge(admin::routes());

    router
}
