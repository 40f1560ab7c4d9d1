use super::*;
use crate::expression::model::ParameterEffect;
use crate::model::memory::InMemoryModel;

const EPS: f32 = 1e-5;

fn rig() -> InMemoryModel {
    InMemoryModel::from_json_str(include_str!("../../data/rig.json")).unwrap()
}

fn effect(id: &str, value: f32, blend: ExpressionBlend) -> ParameterEffect {
    ParameterEffect {
        id: id.to_owned(),
        value,
        blend,
    }
}

fn expr(name: &str, effects: Vec<ParameterEffect>) -> Expression {
    Expression::new(name, effects)
}

/// Restore base values like the session does, then tick.
fn tick_from(model: &mut InMemoryModel, base: &[(usize, f32)], c: &mut ExpressionController, dt: f32) {
    for &(i, v) in base {
        model.set_parameter_value(i, v);
    }
    c.tick(model, dt);
}

#[test]
fn two_add_expressions_sum() {
    let mut m = rig();
    let mut c = ExpressionController::new([
        expr("a", vec![effect("ParamAngleX", 2.0, ExpressionBlend::Add)]),
        expr("b", vec![effect("ParamAngleX", 3.0, ExpressionBlend::Add)]),
    ]);
    c.activate("a", 0.0);
    c.activate("b", 0.0);
    tick_from(&mut m, &[(0, 1.0)], &mut c, 0.016);
    assert!((m.parameter_value(0) - 6.0).abs() < EPS);
}

#[test]
fn zero_fade_completes_on_first_tick() {
    let mut m = rig();
    let mut c = ExpressionController::new([expr(
        "a",
        vec![effect("ParamAngleX", 10.0, ExpressionBlend::Add)],
    )]);
    c.activate("a", 0.0);
    c.tick(&mut m, 0.0);
    assert_eq!(c.progress(), 1.0);
    assert!((m.parameter_value(0) - 10.0).abs() < EPS);
}

#[test]
fn progress_is_monotonic_and_clamped() {
    let mut m = rig();
    let mut c = ExpressionController::new([expr(
        "a",
        vec![effect("ParamAngleX", 1.0, ExpressionBlend::Add)],
    )]);
    c.activate("a", 0.5);
    assert_eq!(c.progress(), 0.0);
    let mut last = 0.0;
    for _ in 0..20 {
        c.tick(&mut m, 0.05);
        let p = c.progress();
        assert!(p >= last);
        assert!((0.0..=1.0).contains(&p));
        last = p;
    }
    assert_eq!(last, 1.0);
}

#[test]
fn non_finite_fade_applies_instantly() {
    for fade in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -1.0] {
        let mut m = rig();
        let mut c = ExpressionController::new([expr(
            "a",
            vec![effect("ParamAngleX", 10.0, ExpressionBlend::Add)],
        )]);
        c.activate("a", fade);
        c.tick(&mut m, 0.1);
        assert_eq!(c.progress(), 1.0);
        assert!((m.parameter_value(0) - 10.0).abs() < EPS);
        assert_eq!(m.parameter_value(1), 1.0);
        assert_eq!(m.parameter_value(2), 0.0);
    }
}

#[test]
fn fade_interpolates_add_halfway() {
    let mut m = rig();
    let mut c = ExpressionController::new([expr(
        "a",
        vec![effect("ParamAngleX", 10.0, ExpressionBlend::Add)],
    )]);
    c.activate("a", 1.0);
    tick_from(&mut m, &[(0, 0.0)], &mut c, 0.5);
    assert!((m.parameter_value(0) - 5.0).abs() < EPS);
}

#[test]
fn deactivation_returns_to_base() {
    let mut m = rig();
    let mut c = ExpressionController::new([
        expr("a", vec![effect("ParamAngleX", 4.0, ExpressionBlend::Add)]),
        expr("b", vec![effect("ParamEyeLOpen", 0.5, ExpressionBlend::Multiply)]),
    ]);
    let base = [(0, 1.0), (1, 1.0)];
    c.activate("a", 0.2);
    c.activate("b", 0.2);
    for _ in 0..10 {
        tick_from(&mut m, &base, &mut c, 0.05);
    }
    assert!((m.parameter_value(1) - 0.5).abs() < EPS);

    c.deactivate("a", 0.3);
    c.deactivate("b", 0.3);
    for _ in 0..10 {
        tick_from(&mut m, &base, &mut c, 0.05);
    }
    assert!((m.parameter_value(0) - 1.0).abs() < EPS);
    assert!((m.parameter_value(1) - 1.0).abs() < EPS);
}

#[test]
fn overwrite_dominates_add_and_multiply() {
    let mut m = rig();
    let mut c = ExpressionController::new([
        expr("add", vec![effect("ParamAngleX", 5.0, ExpressionBlend::Add)]),
        expr("mul", vec![effect("ParamAngleX", 2.0, ExpressionBlend::Multiply)]),
        expr("rpl", vec![effect("ParamAngleX", -7.0, ExpressionBlend::Overwrite)]),
    ]);
    for n in ["add", "mul", "rpl"] {
        c.activate(n, 0.0);
    }
    tick_from(&mut m, &[(0, 1.0)], &mut c, 0.1);
    assert_eq!(m.parameter_value(0), -7.0);
}

#[test]
fn overwrite_tie_breaks_on_library_order() {
    let mut m = rig();
    let mut c = ExpressionController::new([
        expr("first", vec![effect("ParamAngleX", 1.0, ExpressionBlend::Overwrite)]),
        expr("second", vec![effect("ParamAngleX", 2.0, ExpressionBlend::Overwrite)]),
    ]);
    c.activate("second", 0.0);
    c.activate("first", 0.0);
    c.tick(&mut m, 0.1);
    assert_eq!(m.parameter_value(0), 2.0);
}

#[test]
fn multiply_contributions_are_summed() {
    let mut m = rig();
    let mut c = ExpressionController::new([
        expr("a", vec![effect("ParamAngleX", 2.0, ExpressionBlend::Multiply)]),
        expr("b", vec![effect("ParamAngleX", 3.0, ExpressionBlend::Multiply)]),
    ]);
    c.activate("a", 0.0);
    c.activate("b", 0.0);
    tick_from(&mut m, &[(0, 1.0)], &mut c, 0.1);
    assert!((m.parameter_value(0) - 5.0).abs() < EPS);
}

#[test]
fn unknown_and_repeated_names_are_ignored() {
    let mut c = ExpressionController::new([expr("a", vec![])]);
    c.activate("nope", 0.0);
    assert!(!c.is_active("nope"));
    c.deactivate("a", 0.0);

    c.activate("a", 1.0);
    let mut m = rig();
    c.tick(&mut m, 0.5);
    // Re-activating must not reset the clock.
    c.activate("a", 1.0);
    assert!((c.progress() - 0.5).abs() < EPS);
}

#[test]
fn new_activation_preempts_running_fade() {
    let mut m = rig();
    let mut c = ExpressionController::new([
        expr("a", vec![effect("ParamAngleX", 10.0, ExpressionBlend::Add)]),
        expr("b", vec![effect("ParamMouthForm", 1.0, ExpressionBlend::Add)]),
    ]);
    c.activate("a", 1.0);
    tick_from(&mut m, &[(0, 0.0), (2, 0.0)], &mut c, 0.5);
    c.activate("b", 1.0);
    assert_eq!(c.progress(), 0.0);
    // `now` is the full "a" composition, so ParamAngleX stays at 10 through the new fade.
    tick_from(&mut m, &[(0, 0.0), (2, 0.0)], &mut c, 0.5);
    assert!((m.parameter_value(0) - 10.0).abs() < EPS);
    assert!((m.parameter_value(2) - 0.5).abs() < EPS);
}

#[test]
fn insert_replaces_same_name_in_place() {
    let mut c = ExpressionController::new([expr("a", vec![]), expr("b", vec![])]);
    c.insert(expr(
        "a",
        vec![effect("ParamAngleX", 1.0, ExpressionBlend::Add)],
    ));
    let names: Vec<_> = c.expression_names().collect();
    assert_eq!(names, ["a", "b"]);
    assert_eq!(c.get("a").unwrap().parameters.len(), 1);
}
