//! Shared application state for all routes.

use crate::auth::TokenKeys;
use crate::clock::Clock;
use crate::config::Settings;
use crate::store::ClinicStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Where avatar uploads land and how they are addressed.
#[derive(Clone, Debug)]
pub struct UploadSettings {
    pub dir: PathBuf,
    pub url_prefix: String,
    pub max_bytes: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ClinicStore>,
    pub clock: Arc<dyn Clock>,
    pub tokens: Arc<TokenKeys>,
    pub uploads: Arc<UploadSettings>,
}

impl AppState {
    pub fn new(store: Arc<dyn ClinicStore>, clock: Arc<dyn Clock>, settings: &Settings) -> Self {
        AppState {
            store,
            clock,
            tokens: Arc::new(TokenKeys::new(
                settings.jwt_secret.as_bytes(),
                chrono::Duration::hours(settings.jwt_ttl_hours),
            )),
            uploads: Arc::new(UploadSettings {
                dir: settings.upload_dir.clone(),
                url_prefix: settings.upload_url_prefix.clone(),
                max_bytes: settings.max_upload_bytes,
            }),
        }
    }
}
