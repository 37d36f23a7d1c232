use std::sync::Arc;
use crate::{config::Config, lightning::LightningBackend, users::UserStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<UserStore>,
    pub lightning: Arc<dyn LightningBackend>,
}

#[cfg(test)]
impl AppState {
    pub fn for_tests(lightning: Arc<dyn LightningBackend>) -> Self {
        Self {
            config: Arc::new(crate::config::test_config()),
            users: Arc::new(UserStore::builtin()),
            lightning,
        }
    }
}
