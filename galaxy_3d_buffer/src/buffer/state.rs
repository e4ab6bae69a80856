/// Structured dump of a buffer's state

use serde::Serialize;

use crate::context::{BufferId, BufferTarget, DataType};
use crate::error::{Error, Result};

/// Snapshot produced by `GpuBuffer::describe_state`, for debugging and tooling only
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BufferState {
    pub target: BufferTarget,
    pub byte_offset: Option<usize>,
    pub handle: Option<BufferId>,
    pub components: u32,
    pub element_count: usize,
    pub data_type: DataType,
}

impl BufferState {
    /// Render the snapshot as a JSON object
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| Error::Serialization(err.to_string()))
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
