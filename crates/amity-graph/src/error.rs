use std::path::PathBuf;

use thiserror::Error;

use crate::model::UserId;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("user not found: {0}")]
    UnknownUser(UserId),

    #[error("user {0} cannot befriend themselves")]
    SelfFriendship(UserId),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GraphError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
