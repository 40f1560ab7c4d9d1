use crate::effects::pipeline::EffectList;
use crate::expression::controller::ExpressionController;
use crate::expression::model::Expression;
use crate::foundation::core::CanvasInfo;
use crate::foundation::error::PuppetryResult;
use crate::model::external::{ModelSimulation, MotionPlayer};
use crate::model::runtime::ModelRuntime;
use crate::model::value::{ModelValue, ValueKind, mirror_values};
use crate::render::graph::{MeshNode, RenderGraph, RenderResources, build_render_graph};
use crate::render::mask::FrameView;
use crate::session::opts::ModelOpts;

/// Value exchanged through the named property surface.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Float(f32),
    Bool(bool),
}

impl PropertyValue {
    pub fn as_f32(self) -> f32 {
        match self {
            Self::Float(v) => v,
            Self::Bool(b) => f32::from(u8::from(b)),
        }
    }

    pub fn as_bool(self) -> bool {
        match self {
            Self::Float(v) => v != 0.0,
            Self::Bool(b) => b,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyGroup {
    Expression,
    Parameter,
    PartOpacity,
}

/// One entry of [`UserModel::property_list`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PropertyInfo {
    pub name: String,
    pub group: PropertyGroup,
    /// Editable range for float properties.
    pub range: Option<(f32, f32)>,
}

struct BoundModel {
    runtime: Box<dyn ModelRuntime>,
    parameters: Vec<ModelValue>,
    parts: Vec<ModelValue>,
    graph: RenderGraph,
}

/// Drives one model runtime: stored values, motion, expressions, effects, simulations and the
/// render graph, in a fixed order every [`UserModel::advance`].
pub struct UserModel {
    opts: ModelOpts,
    bound: Option<BoundModel>,
    expressions: ExpressionController,
    effects: EffectList,
    motion: Option<Box<dyn MotionPlayer>>,
    physics: Option<Box<dyn ModelSimulation>>,
    pose: Option<Box<dyn ModelSimulation>>,
}

impl std::fmt::Debug for UserModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserModel")
            .field("opts", &self.opts)
            .field("bound", &self.bound.is_some())
            .field("expressions", &self.expressions)
            .field("effects", &self.effects)
            .finish_non_exhaustive()
    }
}

impl UserModel {
    pub fn new(opts: ModelOpts) -> PuppetryResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            bound: None,
            expressions: ExpressionController::default(),
            effects: EffectList::new(),
            motion: None,
            physics: None,
            pose: None,
        })
    }

    pub fn opts(&self) -> &ModelOpts {
        &self.opts
    }

    pub fn set_opts(&mut self, opts: ModelOpts) -> PuppetryResult<()> {
        opts.validate()?;
        self.opts = opts;
        Ok(())
    }

    /// Take ownership of `runtime`, mirror its values and build the render graph.
    ///
    /// A previously bound runtime is released first.
    #[tracing::instrument(skip_all)]
    pub fn bind(
        &mut self,
        runtime: Box<dyn ModelRuntime>,
        resources: &RenderResources<'_>,
    ) -> PuppetryResult<()> {
        self.unbind();
        let graph = build_render_graph(runtime.as_ref(), resources)?;
        let (parameters, parts): (Vec<_>, Vec<_>) = mirror_values(runtime.as_ref())
            .into_iter()
            .partition(|v| v.kind() == ValueKind::Parameter);
        self.bound = Some(BoundModel {
            runtime,
            parameters,
            parts,
            graph,
        });
        self.effects.mark_dirty();
        Ok(())
    }

    /// Terminate effects, drop the graph and hand the runtime back.
    pub fn unbind(&mut self) -> Option<Box<dyn ModelRuntime>> {
        let mut b = self.bound.take()?;
        self.effects.term_all(b.runtime.as_mut());
        self.effects.mark_dirty();
        Some(b.runtime)
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    pub fn runtime(&self) -> Option<&dyn ModelRuntime> {
        self.bound.as_ref().map(|b| b.runtime.as_ref())
    }

    pub fn expressions(&self) -> &ExpressionController {
        &self.expressions
    }

    pub fn expressions_mut(&mut self) -> &mut ExpressionController {
        &mut self.expressions
    }

    pub fn insert_expression(&mut self, expression: Expression) {
        self.expressions.insert(expression);
    }

    pub fn effects_mut(&mut self) -> &mut EffectList {
        &mut self.effects
    }

    pub fn set_motion(&mut self, motion: Option<Box<dyn MotionPlayer>>) {
        self.motion = motion;
    }

    pub fn set_physics(&mut self, physics: Option<Box<dyn ModelSimulation>>) {
        self.physics = physics;
    }

    pub fn set_pose(&mut self, pose: Option<Box<dyn ModelSimulation>>) {
        self.pose = pose;
    }

    /// Run one frame. Does nothing until a runtime is bound.
    pub fn advance(&mut self, delta: f32, view: &FrameView) {
        let Some(b) = self.bound.as_mut() else {
            tracing::warn!("advance called on an unbound model");
            return;
        };
        let model = b.runtime.as_mut();

        for v in &b.parameters {
            v.apply(model);
        }
        if let Some(motion) = self.motion.as_mut() {
            motion.advance(model, delta);
        }
        if !self.motion.as_ref().is_some_and(|m| m.is_playing()) {
            self.expressions.tick(model, delta);
        }

        self.effects.prologue(model, delta);
        self.effects.process(model, delta);

        for v in &b.parts {
            v.apply(model);
        }

        if self.opts.physics_evaluate
            && let Some(physics) = self.physics.as_mut()
        {
            physics.evaluate(model, delta);
        }
        if self.opts.pose_update
            && let Some(pose) = self.pose.as_mut()
        {
            pose.evaluate(model, delta);
        }
        model.update();
        self.effects.epilogue(model, delta);

        b.graph
            .update(b.runtime.as_ref(), self.opts.mask_viewport_size, view);
    }

    pub fn canvas_info(&self) -> Option<CanvasInfo> {
        self.bound.as_ref().map(|b| b.runtime.canvas_info())
    }

    pub fn parameters(&self) -> &[ModelValue] {
        self.bound
            .as_ref()
            .map(|b| b.parameters.as_slice())
            .unwrap_or_default()
    }

    pub fn part_opacities(&self) -> &[ModelValue] {
        self.bound
            .as_ref()
            .map(|b| b.parts.as_slice())
            .unwrap_or_default()
    }

    pub fn render_graph(&self) -> Option<&RenderGraph> {
        self.bound.as_ref().map(|b| &b.graph)
    }

    /// Mesh node for the drawable with id `name`.
    pub fn mesh(&self, name: &str) -> Option<&MeshNode> {
        self.render_graph()?.mesh(name)
    }

    fn value_mut(&mut self, name: &str) -> Option<&mut ModelValue> {
        let b = self.bound.as_mut()?;
        b.parameters
            .iter_mut()
            .chain(b.parts.iter_mut())
            .find(|v| v.id() == name)
    }

    fn value(&self, name: &str) -> Option<&ModelValue> {
        self.parameters()
            .iter()
            .chain(self.part_opacities())
            .find(|v| v.id() == name)
    }

    /// Write a parameter, part opacity or expression toggle by name.
    ///
    /// Expressions fade with their own fade-in/fade-out times. Returns `false` for unknown names.
    pub fn set_property(&mut self, name: &str, value: PropertyValue) -> bool {
        if let Some(v) = self.value_mut(name) {
            v.set_value(value.as_f32());
            return true;
        }
        let Some(e) = self.expressions.get(name) else {
            return false;
        };
        let (fade_in, fade_out) = (e.fade_in_time, e.fade_out_time);
        if value.as_bool() {
            self.expressions.activate(name, fade_in);
        } else {
            self.expressions.deactivate(name, fade_out);
        }
        true
    }

    pub fn property(&self, name: &str) -> Option<PropertyValue> {
        if let Some(v) = self.value(name) {
            return Some(PropertyValue::Float(v.value()));
        }
        self.expressions
            .get(name)
            .map(|_| PropertyValue::Bool(self.expressions.is_active(name)))
    }

    /// Value `name` reverts to; part opacities have none.
    pub fn property_revert(&self, name: &str) -> Option<PropertyValue> {
        if let Some(v) = self.parameters().iter().find(|v| v.id() == name) {
            return Some(PropertyValue::Float(v.default_value()));
        }
        self.expressions
            .get(name)
            .map(|_| PropertyValue::Bool(false))
    }

    /// Expressions, then parameters, then part opacities.
    pub fn property_list(&self) -> Vec<PropertyInfo> {
        let expressions = self.expressions.expression_names().map(|n| PropertyInfo {
            name: n.to_owned(),
            group: PropertyGroup::Expression,
            range: None,
        });
        let values = self
            .parameters()
            .iter()
            .chain(self.part_opacities())
            .map(|v| PropertyInfo {
                name: v.id().to_owned(),
                group: match v.kind() {
                    ValueKind::Parameter => PropertyGroup::Parameter,
                    ValueKind::PartOpacity => PropertyGroup::PartOpacity,
                },
                range: Some((v.minimum(), v.maximum())),
            });
        expressions.chain(values).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/user_model.rs"]
mod tests;
