/// Host-memory rendering context (no GPU required)
///
/// Emulates the buffer-object entry points of a device on top of plain
/// vectors, with the device's error model: a failing call leaves storage
/// untouched and latches an error code that the next `get_error` returns.
///
/// Besides backing tests and tooling it can simulate the situations a real
/// device produces rarely: a memory limit that turns large allocations into
/// `OUT_OF_MEMORY`, injected error codes, capability sets without readback
/// and context loss.
///
/// Every mutating entry point is appended to a call log (`calls()`), queries
/// (`is_valid`, `capabilities`, `get_error`) are not.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::context::{
    AttribLayout, AttribLocation, BufferId, BufferTarget, BufferUsage, ContextCapabilities,
    DeviceError, DiagnosticMessage, RenderContext,
};
use crate::utils::NameAllocator;

// ===== CONFIG =====

/// Configuration of a SoftwareContext
#[derive(Debug, Clone)]
pub struct SoftwareContextConfig {
    /// Entry points the context exposes
    pub capabilities: ContextCapabilities,
    /// Total bytes all buffers may hold, `None` for unlimited
    pub memory_limit: Option<usize>,
}

impl Default for SoftwareContextConfig {
    fn default() -> Self {
        Self {
            capabilities: ContextCapabilities::all(),
            memory_limit: None,
        }
    }
}

// ===== SOFTWARE CONTEXT =====

#[derive(Debug)]
struct Storage {
    bytes: Vec<u8>,
    usage: Option<BufferUsage>,
}

pub struct SoftwareContext {
    config: SoftwareContextConfig,
    valid: bool,
    names: NameAllocator,
    storages: FxHashMap<BufferId, Storage>,
    bindings: FxHashMap<BufferTarget, BufferId>,
    layouts: FxHashMap<AttribLocation, AttribLayout>,
    enabled: FxHashSet<AttribLocation>,
    pending_error: Option<DeviceError>,
    injected: VecDeque<DeviceError>,
    messages: Vec<DiagnosticMessage>,
    calls: Vec<String>,
}

impl SoftwareContext {
    /// Context exposing every capability, without memory limit
    pub fn new() -> Self {
        Self::with_config(SoftwareContextConfig::default())
    }

    pub fn with_config(config: SoftwareContextConfig) -> Self {
        Self {
            config,
            valid: true,
            names: NameAllocator::new(),
            storages: FxHashMap::default(),
            bindings: FxHashMap::default(),
            layouts: FxHashMap::default(),
            enabled: FxHashSet::default(),
            pending_error: None,
            injected: VecDeque::new(),
            messages: Vec::new(),
            calls: Vec::new(),
        }
    }

    // ===== SIMULATION CONTROLS =====

    /// Mark the context as lost (false) or restored (true)
    pub fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    pub fn set_capabilities(&mut self, capabilities: ContextCapabilities) {
        self.config.capabilities = capabilities;
    }

    pub fn set_memory_limit(&mut self, limit: Option<usize>) {
        self.config.memory_limit = limit;
    }

    /// Make the next transfer call (data, sub data, readback) fail with `error`
    ///
    /// Errors are consumed in injection order, one per transfer call.
    pub fn inject_error(&mut self, error: DeviceError) {
        self.injected.push_back(error);
    }

    // ===== INSPECTION =====

    /// Names of the mutating entry points called so far
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Messages pushed into the diagnostic sink
    pub fn messages(&self) -> &[DiagnosticMessage] {
        &self.messages
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    /// Buffer currently bound to `target`
    pub fn bound_buffer(&self, target: BufferTarget) -> Option<BufferId> {
        self.bindings.get(&target).copied()
    }

    /// Number of buffer names alive on this context
    pub fn live_buffers(&self) -> usize {
        self.names.len()
    }

    /// Highest buffer name handed out so far
    pub fn high_water_mark(&self) -> u32 {
        self.names.high_water_mark()
    }

    /// Storage of `id`, `None` if the name is not alive
    pub fn buffer_contents(&self, id: BufferId) -> Option<&[u8]> {
        self.storages.get(&id).map(|storage| storage.bytes.as_slice())
    }

    /// Usage hint given by the last full upload of `id`
    pub fn buffer_usage(&self, id: BufferId) -> Option<BufferUsage> {
        self.storages.get(&id).and_then(|storage| storage.usage)
    }

    /// Total bytes held by all buffers
    pub fn allocated_bytes(&self) -> usize {
        self.storages.values().map(|storage| storage.bytes.len()).sum()
    }

    pub fn is_attribute_enabled(&self, location: AttribLocation) -> bool {
        self.enabled.contains(&location)
    }

    pub fn attribute_layout(&self, location: AttribLocation) -> Option<AttribLayout> {
        self.layouts.get(&location).copied()
    }

    // ===== INTERNALS =====

    fn record(&mut self, call: &str) {
        self.calls.push(call.to_string());
    }

    /// Latch an error; like the device, the first one sticks until queried
    fn raise(&mut self, error: DeviceError) {
        if self.pending_error.is_none() {
            self.pending_error = Some(error);
        }
    }

    /// Consume an injected error, raising it. True if the call must fail.
    fn take_injected(&mut self) -> bool {
        match self.injected.pop_front() {
            Some(error) => {
                self.raise(error);
                true
            }
            None => false,
        }
    }

    fn bound_storage(&mut self, target: BufferTarget) -> Option<&mut Storage> {
        let id = self.bindings.get(&target).copied()?;
        self.storages.get_mut(&id)
    }
}

impl Default for SoftwareContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext for SoftwareContext {
    fn is_valid(&self) -> bool {
        self.valid
    }

    fn capabilities(&self) -> ContextCapabilities {
        self.config.capabilities
    }

    fn gen_buffer(&mut self) -> Option<BufferId> {
        self.record("gen_buffer");
        let id = self.names.alloc()?;
        self.storages.insert(id, Storage { bytes: Vec::new(), usage: None });
        Some(id)
    }

    fn delete_buffer(&mut self, id: BufferId) {
        self.record("delete_buffer");
        if !self.names.free(id) {
            self.raise(DeviceError::InvalidValue);
            return;
        }
        self.storages.remove(&id);
        self.bindings.retain(|_, bound| *bound != id);
    }

    fn bind_buffer(&mut self, target: BufferTarget, id: Option<BufferId>) {
        self.record("bind_buffer");
        match id {
            Some(id) if self.names.is_live(id) => {
                self.bindings.insert(target, id);
            }
            Some(_) => self.raise(DeviceError::InvalidOperation),
            None => {
                self.bindings.remove(&target);
            }
        }
    }

    fn buffer_data(&mut self, target: BufferTarget, size: usize, data: Option<&[u8]>, usage: BufferUsage) {
        self.record("buffer_data");
        if self.take_injected() {
            return;
        }
        if data.is_some_and(|bytes| bytes.len() < size) {
            self.raise(DeviceError::InvalidValue);
            return;
        }
        let limit = self.config.memory_limit;
        let others = self.allocated_bytes();
        let Some(storage) = self.bound_storage(target) else {
            self.raise(DeviceError::InvalidOperation);
            return;
        };
        let in_use = others - storage.bytes.len();
        if limit.is_some_and(|limit| in_use + size > limit) {
            self.raise(DeviceError::OutOfMemory);
            return;
        }
        storage.bytes = match data {
            Some(bytes) => bytes[..size].to_vec(),
            None => vec![0; size],
        };
        storage.usage = Some(usage);
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]) {
        self.record("buffer_sub_data");
        if self.take_injected() {
            return;
        }
        let Some(storage) = self.bound_storage(target) else {
            self.raise(DeviceError::InvalidOperation);
            return;
        };
        match offset.checked_add(data.len()) {
            Some(end) if end <= storage.bytes.len() => {
                storage.bytes[offset..end].copy_from_slice(data);
            }
            _ => self.raise(DeviceError::InvalidValue),
        }
    }

    fn get_buffer_sub_data(&mut self, target: BufferTarget, offset: usize, out: &mut [u8]) -> bool {
        if !self.config.capabilities.contains(ContextCapabilities::BUFFER_READBACK) {
            return false;
        }
        self.record("get_buffer_sub_data");
        if self.take_injected() {
            return true;
        }
        let Some(storage) = self.bound_storage(target) else {
            self.raise(DeviceError::InvalidOperation);
            return true;
        };
        match offset.checked_add(out.len()) {
            Some(end) if end <= storage.bytes.len() => {
                out.copy_from_slice(&storage.bytes[offset..end]);
            }
            _ => self.raise(DeviceError::InvalidValue),
        }
        true
    }

    fn enable_vertex_attrib_array(&mut self, location: AttribLocation) {
        self.record("enable_vertex_attrib_array");
        self.enabled.insert(location);
    }

    fn disable_vertex_attrib_array(&mut self, location: AttribLocation) {
        self.record("disable_vertex_attrib_array");
        self.enabled.remove(&location);
    }

    fn vertex_attrib_pointer(&mut self, location: AttribLocation, layout: AttribLayout) {
        self.record("vertex_attrib_pointer");
        if !self.bindings.contains_key(&BufferTarget::Array) || !(1..=4).contains(&layout.components) {
            self.raise(DeviceError::InvalidOperation);
            return;
        }
        self.layouts.insert(location, layout);
    }

    fn get_error(&mut self) -> Option<DeviceError> {
        self.pending_error.take()
    }

    fn push_message(&mut self, message: DiagnosticMessage) {
        self.messages.push(message);
    }
}

#[cfg(test)]
#[path = "software_context_tests.rs"]
mod tests;
