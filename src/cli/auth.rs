use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{config::Config, spotify, types::PkceToken};

pub async fn auth(cfg: &Config, shared_state: Arc<Mutex<Option<PkceToken>>>) {
    spotify::auth::auth(cfg, shared_state).await;
}
