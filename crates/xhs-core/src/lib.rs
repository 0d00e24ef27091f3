pub mod app_config;
pub mod author;
pub mod config;

pub use app_config::{AppConfig, ScrapeTiming};
pub use author::{clean_user_id, sentinel, AuthorProfile, AuthorRecord, CardFallback, NoteDetail};
pub use config::{load_config, load_config_from_env, ConfigError};
