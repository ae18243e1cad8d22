pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "unrecognized profile {tag:?}; known profiles: {}",
        format_known(known)
    )]
    UnknownProfile { tag: String, known: Vec<String> },

    #[error("invalid parameter {variable}: {reason}")]
    InvalidParameter {
        variable: String,
        reason: &'static str,
    },
}

fn format_known(known: &[String]) -> String {
    if known.is_empty() {
        "(none)".to_owned()
    } else {
        known.join(", ")
    }
}
