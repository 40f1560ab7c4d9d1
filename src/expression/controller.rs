use std::collections::{HashMap, HashSet};

use crate::expression::model::{Expression, ExpressionBlend};
use crate::foundation::math::{inverse_lerp, lerp};
use crate::model::runtime::ModelRuntime;

/// One composed state of every active expression.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct BlendSnapshot {
    pub(crate) fade: f32,
    pub(crate) add: HashMap<String, f32>,
    pub(crate) mul: HashMap<String, f32>,
    pub(crate) rpl: HashMap<String, f32>,
}

/// Two-slot ring of composed snapshots plus the time since the last transition.
#[derive(Clone, Debug, Default)]
struct BlendQueue {
    slots: [BlendSnapshot; 2],
    head: usize,
    elapsed: f32,
}

impl BlendQueue {
    fn now(&self) -> &BlendSnapshot {
        &self.slots[self.head]
    }

    fn next(&self) -> &BlendSnapshot {
        &self.slots[1 - self.head]
    }

    /// The old `next` becomes `now`; `snapshot` takes the freed slot.
    fn push(&mut self, snapshot: BlendSnapshot) {
        self.slots[self.head] = snapshot;
        self.head = 1 - self.head;
        self.elapsed = 0.0;
    }

    fn progress(&self) -> f32 {
        let fade = self.next().fade;
        if fade <= 0.0 {
            return 1.0;
        }
        inverse_lerp(0.0, fade, self.elapsed).clamp(0.0, 1.0)
    }
}

/// Blends a library of expressions onto model parameters with cross-fades.
///
/// Activation changes recompose the target state immediately; [`ExpressionController::tick`]
/// moves parameters from the previous composition toward it.
#[derive(Clone, Debug, Default)]
pub struct ExpressionController {
    library: Vec<Expression>,
    by_name: HashMap<String, usize>,
    active: HashSet<String>,
    queue: BlendQueue,
}

impl ExpressionController {
    pub fn new(expressions: impl IntoIterator<Item = Expression>) -> Self {
        let mut out = Self::default();
        for e in expressions {
            out.insert(e);
        }
        out
    }

    /// Add `expression` to the library; a same-named entry is replaced in place.
    pub fn insert(&mut self, expression: Expression) {
        match self.by_name.get(&expression.name) {
            Some(&i) => self.library[i] = expression,
            None => {
                self.by_name
                    .insert(expression.name.clone(), self.library.len());
                self.library.push(expression);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Expression> {
        self.by_name.get(name).map(|&i| &self.library[i])
    }

    /// Library names in insertion order.
    pub fn expression_names(&self) -> impl Iterator<Item = &str> {
        self.library.iter().map(|e| e.name.as_str())
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains(name)
    }

    pub fn activate(&mut self, name: &str, fade: f32) {
        if !self.by_name.contains_key(name) || self.active.contains(name) {
            return;
        }
        tracing::debug!(expression = name, fade, "activate expression");
        self.active.insert(name.to_owned());
        self.recompose(fade);
    }

    pub fn deactivate(&mut self, name: &str, fade: f32) {
        if !self.active.remove(name) {
            return;
        }
        tracing::debug!(expression = name, fade, "deactivate expression");
        self.recompose(fade);
    }

    /// Fraction of the current transition completed, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.queue.progress()
    }

    fn recompose(&mut self, fade: f32) {
        // Non-finite or negative fades apply instantly.
        let fade = if fade.is_finite() { fade.max(0.0) } else { 0.0 };
        let mut next = BlendSnapshot {
            fade,
            ..BlendSnapshot::default()
        };
        for e in self.library.iter().filter(|e| self.active.contains(&e.name)) {
            for p in &e.parameters {
                match p.blend {
                    ExpressionBlend::Add => *next.add.entry(p.id.clone()).or_insert(0.0) += p.value,
                    // Multiplier contributions are summed, not multiplied.
                    ExpressionBlend::Multiply => {
                        *next.mul.entry(p.id.clone()).or_insert(0.0) += p.value
                    }
                    ExpressionBlend::Overwrite => {
                        next.rpl.insert(p.id.clone(), p.value);
                    }
                }
            }
        }
        self.queue.push(next);
    }

    /// Advance the transition clock and write blended values into `model`'s parameters.
    pub fn tick(&mut self, model: &mut dyn ModelRuntime, delta: f32) {
        self.queue.elapsed += delta;
        let t = self.queue.progress();
        let (now, next) = (self.queue.now(), self.queue.next());
        if now.add.is_empty()
            && now.mul.is_empty()
            && now.rpl.is_empty()
            && next.add.is_empty()
            && next.mul.is_empty()
            && next.rpl.is_empty()
        {
            return;
        }

        for index in 0..model.parameter_count() {
            let Some(info) = model.parameter_info(index) else {
                continue;
            };
            let id = info.id;
            let v = model.parameter_value(index);
            let add = lerp(
                now.add.get(id).copied().unwrap_or(0.0),
                next.add.get(id).copied().unwrap_or(0.0),
                t,
            );
            let mul = lerp(
                now.mul.get(id).copied().unwrap_or(1.0),
                next.mul.get(id).copied().unwrap_or(1.0),
                t,
            );
            let rpl = lerp(
                now.rpl.get(id).copied().unwrap_or(v),
                next.rpl.get(id).copied().unwrap_or(v),
                t,
            );
            let out = if rpl != v { rpl } else { (v + add) * mul };
            if out != v {
                model.set_parameter_value(index, out);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/controller.rs"]
mod tests;
