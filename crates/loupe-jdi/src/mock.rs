use std::collections::HashMap;

use crate::{DebugValue, DebugVariable, SourceError, ThreadId, ValueId, ValueSource};

/// Deterministic, in-memory value source test double.
#[derive(Default)]
pub struct MockValueSource {
    frames: HashMap<ThreadId, Result<Option<Vec<DebugVariable>>, SourceError>>,
    children: HashMap<ValueId, Result<Vec<DebugVariable>, SourceError>>,
}

impl MockValueSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_frame(&mut self, thread: ThreadId, vars: Vec<DebugVariable>) {
        self.frames.insert(thread, Ok(Some(vars)));
    }

    /// Marks the thread's top frame as having no variable information,
    /// mirroring a native-method frame.
    pub fn mark_unavailable(&mut self, thread: ThreadId) {
        self.frames.insert(thread, Ok(None));
    }

    pub fn fail_frame(&mut self, thread: ThreadId, err: SourceError) {
        self.frames.insert(thread, Err(err));
    }

    pub fn insert_children(&mut self, id: ValueId, vars: Vec<DebugVariable>) {
        self.children.insert(id, Ok(vars));
    }

    pub fn fail_children(&mut self, id: ValueId, err: SourceError) {
        self.children.insert(id, Err(err));
    }
}

impl ValueSource for MockValueSource {
    fn top_frame_variables(
        &mut self,
        thread: ThreadId,
    ) -> Result<Option<Vec<DebugVariable>>, SourceError> {
        match self.frames.get(&thread) {
            Some(result) => result.clone(),
            None => Err(SourceError::Other(format!(
                "no mock frame configured for thread {thread}"
            ))),
        }
    }

    fn children(&mut self, value: &DebugValue) -> Result<Vec<DebugVariable>, SourceError> {
        let id = match value.id {
            Some(id) => id,
            None => {
                return Err(SourceError::Other(
                    "value has no identity to look children up by".to_string(),
                ))
            }
        };
        match self.children.get(&id) {
            Some(result) => result.clone(),
            None => Err(SourceError::UnknownValueId(id)),
        }
    }
}
