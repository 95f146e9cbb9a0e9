use std::sync::Arc;

use axum::Router;

use crate::main_lib::AppState;

mod ghl;
mod health;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().merge(health::router()).merge(ghl::router())
}
