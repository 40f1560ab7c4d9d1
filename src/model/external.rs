use crate::model::runtime::ModelRuntime;

/// Upstream animation playback writing parameter values before expressions are applied.
pub trait MotionPlayer {
    fn advance(&mut self, model: &mut dyn ModelRuntime, delta: f32);

    /// While a motion plays, expression overlays are not evaluated.
    fn is_playing(&self) -> bool;
}

/// A physics or pose solver run after parameters and part opacities are settled.
pub trait ModelSimulation {
    fn evaluate(&mut self, model: &mut dyn ModelRuntime, delta: f32);
}
