use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse template {name}")]
    Template {
        name: String,
        source: minijinja::Error,
    },

    #[error("failed to read config from {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to render template {name}")]
    Render {
        name: String,
        source: minijinja::Error,
    },
}
