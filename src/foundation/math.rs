use crate::foundation::core::{Point, Rect};

pub(crate) fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Position of `value` between `from` and `to`; unclamped, `0.0` for an empty range.
pub(crate) fn inverse_lerp(from: f32, to: f32, value: f32) -> f32 {
    let span = to - from;
    if span == 0.0 {
        return 0.0;
    }
    (value - from) / span
}

/// Axis-aligned bounds of `points`, or `Rect::ZERO` when there are none.
pub(crate) fn bounds_of_points(points: &[Point]) -> Rect {
    let Some((first, rest)) = points.split_first() else {
        return Rect::ZERO;
    };
    rest.iter()
        .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
}

/// Overlap with positive area; rects that merely touch do not intersect.
pub(crate) fn rects_intersect(a: Rect, b: Rect) -> bool {
    let (a, b) = (a.abs(), b.abs());
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

/// `outer` fully contains `inner`, edges inclusive.
pub(crate) fn rect_encloses(outer: Rect, inner: Rect) -> bool {
    let (outer, inner) = (outer.abs(), inner.abs());
    inner.x0 >= outer.x0 && inner.x1 <= outer.x1 && inner.y0 >= outer.y0 && inner.y1 <= outer.y1
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
