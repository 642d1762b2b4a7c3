pub mod loader;
pub mod schema;

pub use loader::{load_config_from_env, load_config_from_vars, parse_file_mode};
pub use schema::{
    CallbackConfig, LogFormat, ResourceSelection, SidecarConfig, DEFAULT_FILE_MODE,
    DEFAULT_FOLDER_ANNOTATION,
};
