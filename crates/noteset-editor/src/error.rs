use thiserror::Error;

use crate::key::RenderKey;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("No entry with render key {0}")]
    UnknownKey(RenderKey),
}
