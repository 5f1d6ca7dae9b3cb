use thiserror::Error;

use crate::node::NodeId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("node not found: {0}")]
    NotFound(NodeId),
    #[error("referenced parent row does not exist: {0}")]
    ReferentialIntegrity(NodeId),
    #[error("interval corruption: {0}")]
    IntervalCorruption(String),
}
