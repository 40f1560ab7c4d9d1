use super::*;
use crate::model::memory::InMemoryModel;

fn rig() -> InMemoryModel {
    InMemoryModel::from_json_str(include_str!("../../data/rig.json")).unwrap()
}

#[test]
fn mirror_lists_parameters_then_parts() {
    let m = rig();
    let values = mirror_values(&m);
    let ids: Vec<_> = values.iter().map(|v| (v.kind(), v.id())).collect();
    assert_eq!(
        ids,
        vec![
            (ValueKind::Parameter, "ParamAngleX"),
            (ValueKind::Parameter, "ParamEyeLOpen"),
            (ValueKind::Parameter, "ParamMouthForm"),
            (ValueKind::PartOpacity, "PartHead"),
        ]
    );
}

#[test]
fn part_opacity_has_unit_range() {
    let m = rig();
    let part = ModelValue::part_opacity(&m, 0).unwrap();
    assert_eq!((part.minimum(), part.maximum(), part.default_value()), (0.0, 1.0, 1.0));
    assert!(ModelValue::part_opacity(&m, 3).is_none());
}

#[test]
fn apply_dispatches_by_kind() {
    let mut m = rig();
    let mut p = ModelValue::parameter(&m, 0).unwrap();
    p.set_value(12.5);
    p.apply(&mut m);
    let mut o = ModelValue::part_opacity(&m, 0).unwrap();
    o.set_value(0.25);
    o.apply(&mut m);
    assert_eq!(m.parameters[0].value, 12.5);
    assert_eq!(m.parts[0].opacity, 0.25);
}

#[test]
fn reset_restores_default() {
    let m = rig();
    let mut p = ModelValue::parameter(&m, 1).unwrap();
    p.set_value(0.0);
    p.reset();
    assert_eq!(p.value(), 1.0);
}
