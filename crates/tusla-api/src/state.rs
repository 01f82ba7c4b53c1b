//! Application state shared across handlers

use std::sync::Arc;

use sqlx::PgPool;

use tusla_core::Config;
use tusla_db::{
    CategoryRepository, PostImageRepository, PostRepository, PostVolunteerRepository,
    UserRepository,
};
use tusla_services::CategorizerService;
use tusla_storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub users: UserRepository,
    pub posts: PostRepository,
    pub post_images: PostImageRepository,
    pub volunteers: PostVolunteerRepository,
    pub categories: CategoryRepository,
    pub storage: Arc<dyn Storage>,
    /// Present only when an Ollama model is configured.
    pub categorizer: Option<CategorizerService>,
    pub config: Config,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
