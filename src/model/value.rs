use crate::model::runtime::{ModelRuntime, ParameterKind};

/// Which runtime slot a [`ModelValue`] mirrors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Parameter,
    PartOpacity,
}

/// A user-editable mirror of one runtime parameter or part opacity.
///
/// The stored value is pushed into the runtime every tick by [`ModelValue::apply`], so
/// expression overlays and simulations always start from it rather than from last frame's output.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelValue {
    Parameter {
        index: usize,
        id: String,
        value: f32,
        minimum: f32,
        maximum: f32,
        default: f32,
        kind: ParameterKind,
    },
    PartOpacity {
        index: usize,
        id: String,
        value: f32,
    },
}

impl ModelValue {
    /// Mirror runtime parameter `index`; `None` when the runtime has no such parameter.
    pub fn parameter(model: &dyn ModelRuntime, index: usize) -> Option<Self> {
        let info = model.parameter_info(index)?;
        Some(Self::Parameter {
            index,
            id: info.id.to_owned(),
            value: model.parameter_value(index),
            minimum: info.minimum,
            maximum: info.maximum,
            default: info.default,
            kind: info.kind,
        })
    }

    /// Mirror runtime part `index`; `None` when the runtime has no such part.
    pub fn part_opacity(model: &dyn ModelRuntime, index: usize) -> Option<Self> {
        let id = model.part_id(index)?.to_owned();
        Some(Self::PartOpacity {
            index,
            id,
            value: model.part_opacity(index),
        })
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Parameter { .. } => ValueKind::Parameter,
            Self::PartOpacity { .. } => ValueKind::PartOpacity,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Parameter { id, .. } | Self::PartOpacity { id, .. } => id,
        }
    }

    pub fn value(&self) -> f32 {
        match self {
            Self::Parameter { value, .. } | Self::PartOpacity { value, .. } => *value,
        }
    }

    pub fn set_value(&mut self, v: f32) {
        match self {
            Self::Parameter { value, .. } | Self::PartOpacity { value, .. } => *value = v,
        }
    }

    pub fn minimum(&self) -> f32 {
        match self {
            Self::Parameter { minimum, .. } => *minimum,
            Self::PartOpacity { .. } => 0.0,
        }
    }

    pub fn maximum(&self) -> f32 {
        match self {
            Self::Parameter { maximum, .. } => *maximum,
            Self::PartOpacity { .. } => 1.0,
        }
    }

    pub fn default_value(&self) -> f32 {
        match self {
            Self::Parameter { default, .. } => *default,
            Self::PartOpacity { .. } => 1.0,
        }
    }

    pub fn reset(&mut self) {
        let d = self.default_value();
        self.set_value(d);
    }

    /// Push the stored value into the runtime slot it mirrors.
    pub fn apply(&self, model: &mut dyn ModelRuntime) {
        match self {
            Self::Parameter { index, value, .. } => model.set_parameter_value(*index, *value),
            Self::PartOpacity { index, value, .. } => model.set_part_opacity(*index, *value),
        }
    }
}

/// Mirror every parameter, then every part, in runtime order.
pub(crate) fn mirror_values(model: &dyn ModelRuntime) -> Vec<ModelValue> {
    let params = (0..model.parameter_count()).filter_map(|i| ModelValue::parameter(model, i));
    let parts = (0..model.part_count()).filter_map(|i| ModelValue::part_opacity(model, i));
    params.chain(parts).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/model/value.rs"]
mod tests;
