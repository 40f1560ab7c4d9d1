use crate::model::runtime::ModelRuntime;

/// A per-frame hook that edits model state at fixed points of the update.
///
/// Phases run in registration order: `prologue` before expressions are applied, `process`
/// after them, `epilogue` after the runtime has recomputed drawables.
pub trait ModelEffect {
    fn init(&mut self, _model: &mut dyn ModelRuntime) {}
    fn term(&mut self, _model: &mut dyn ModelRuntime) {}
    fn prologue(&mut self, _model: &mut dyn ModelRuntime, _delta: f32) {}
    fn process(&mut self, _model: &mut dyn ModelRuntime, _delta: f32) {}
    fn epilogue(&mut self, _model: &mut dyn ModelRuntime, _delta: f32) {}
}

/// Handle returned by [`EffectList::push`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EffectId(u64);

/// Ordered effect registrations.
///
/// Any change marks the list dirty; the next [`EffectList::process`] terminates and
/// re-initialises every registered effect before running it.
#[derive(Default)]
pub struct EffectList {
    entries: Vec<(EffectId, Box<dyn ModelEffect>)>,
    next_id: u64,
    dirty: bool,
}

impl std::fmt::Debug for EffectList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectList")
            .field("len", &self.entries.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl EffectList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: Box<dyn ModelEffect>) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, effect));
        self.dirty = true;
        id
    }

    /// Unregister `id`, handing the effect back; it does not receive `term`.
    pub fn remove(&mut self, id: EffectId) -> Option<Box<dyn ModelEffect>> {
        let pos = self.entries.iter().position(|(e, _)| *e == id)?;
        self.dirty = true;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn prologue(&mut self, model: &mut dyn ModelRuntime, delta: f32) {
        for (_, e) in &mut self.entries {
            e.prologue(model, delta);
        }
    }

    pub fn process(&mut self, model: &mut dyn ModelRuntime, delta: f32) {
        if self.dirty {
            tracing::debug!(effects = self.entries.len(), "re-initialise effects");
            self.term_all(model);
            self.init_all(model);
            self.dirty = false;
        }
        for (_, e) in &mut self.entries {
            e.process(model, delta);
        }
    }

    pub fn epilogue(&mut self, model: &mut dyn ModelRuntime, delta: f32) {
        for (_, e) in &mut self.entries {
            e.epilogue(model, delta);
        }
    }

    fn init_all(&mut self, model: &mut dyn ModelRuntime) {
        for (_, e) in &mut self.entries {
            e.init(model);
        }
    }

    pub(crate) fn term_all(&mut self, model: &mut dyn ModelRuntime) {
        for (_, e) in &mut self.entries {
            e.term(model);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/pipeline.rs"]
mod tests;
