use super::*;
use crate::foundation::core::Size;
use crate::model::memory::InMemoryModel;

const TEXTURES: [TextureHandle; 2] = [TextureHandle(10), TextureHandle(11)];

fn rig() -> InMemoryModel {
    InMemoryModel::from_json_str(include_str!("../../data/rig.json")).unwrap()
}

fn build(model: &InMemoryModel) -> RenderGraph {
    let shaders = ShaderLibrary::sequential();
    build_render_graph(
        model,
        &RenderResources {
            shaders: &shaders,
            textures: &TEXTURES,
        },
    )
    .unwrap()
}

#[test]
fn builds_meshes_for_non_degenerate_drawables() {
    let g = build(&rig());
    let ids: Vec<_> = g.meshes().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["face", "head_clip", "eye", "shadow"]);
    assert!(g.mesh("empty").is_none());
    assert_eq!(g.viewports().len(), 2);
}

#[test]
fn materials_follow_classifier_and_resources() {
    let g = build(&rig());
    let face = g.mesh("face").unwrap();
    assert_eq!(face.material.variant, ShaderVariant::NormMix);
    assert_eq!(face.material.get(TEX_MAIN), Some(&MaterialParam::Texture(TextureHandle(10))));
    assert!(face.material.get(TEX_MASK).is_none());

    let eye = g.mesh("eye").unwrap();
    assert_eq!(eye.material.variant, ShaderVariant::MaskAdd);
    assert_eq!(eye.material.shader, ShaderLibrary::sequential().get(ShaderVariant::MaskAdd));
    assert_eq!(
        eye.material.get(CANVAS_SIZE),
        Some(&MaterialParam::Size(Size::new(400.0, 400.0)))
    );
    assert_eq!(eye.material.get(TEX_MASK), Some(&MaterialParam::Target(RenderTargetId(0))));

    let shadow = g.mesh("shadow").unwrap();
    assert_eq!(shadow.material.variant, ShaderVariant::MaskMulInv);
    assert_eq!(
        shadow.material.get(crate::render::material::COLOR_BASE),
        Some(&MaterialParam::Color(ColorRgba::new(1.0, 1.0, 1.0, 0.5)))
    );
}

#[test]
fn mask_meshes_skip_degenerate_drawables() {
    let g = build(&rig());
    let shadow = g.mesh("shadow").unwrap();
    let vp = g.viewport_of(shadow).unwrap();
    assert_eq!(vp.owner, 3);
    assert_eq!(vp.masks.len(), 1);
    let m = &vp.masks[0];
    assert_eq!((m.drawable, m.slot), (1, 0));
    assert_eq!(m.material.variant, ShaderVariant::Mask);
    assert!(m.visible);
}

#[test]
fn initial_viewport_matches_local_bounds() {
    let g = build(&rig());
    let eye = g.mesh("eye").unwrap();
    assert_eq!(eye.local_bounds, Rect::new(-50.0, -25.0, 50.0, 0.0));
    assert_eq!(g.viewport_of(eye).unwrap().size, (100, 25));
}

#[test]
fn missing_texture_fails_build() {
    let shaders = ShaderLibrary::sequential();
    let err = build_render_graph(
        &rig(),
        &RenderResources {
            shaders: &shaders,
            textures: &TEXTURES[..1],
        },
    )
    .unwrap_err();
    assert!(err.to_string().contains("texture 1"));
}

#[test]
fn update_sizes_visible_mask_targets() {
    let m = rig();
    let mut g = build(&m);
    g.update(&m, 0, &FrameView::for_canvas(&m.canvas));
    let eye = g.mesh("eye").unwrap();
    assert_eq!(g.viewport_of(eye).unwrap().size, (100, 25));
    assert_eq!(eye.material.get(MASK_SCALE), Some(&MaterialParam::Float(1.0)));
    assert_eq!(
        eye.material.get(MESH_OFFSET),
        Some(&MaterialParam::Vec2(Vec2::new(-50.0, -25.0)))
    );
}

#[test]
fn update_applies_mask_limit() {
    let m = rig();
    let mut g = build(&m);
    g.update(&m, 50, &FrameView::for_canvas(&m.canvas));
    let eye = g.mesh("eye").unwrap();
    assert_eq!(g.viewport_of(eye).unwrap().size, (50, 12));
    assert_eq!(eye.material.get(MASK_SCALE), Some(&MaterialParam::Float(0.5)));
}

#[test]
fn off_screen_drawables_get_placeholder_targets() {
    let m = rig();
    let mut g = build(&m);
    let view = FrameView {
        canvas_transform: Affine::translate((5000.0, 5000.0)),
        ..FrameView::for_canvas(&m.canvas)
    };
    g.update(&m, 0, &view);
    for vp in g.viewports() {
        assert_eq!(vp.size, MASK_PLACEHOLDER_SIZE);
        assert!(vp.culled);
    }

    g.update(&m, 0, &FrameView { editor_hint: true, ..view });
    assert!(!g.viewports()[0].culled);
}

#[test]
fn update_refreshes_visibility_order_and_geometry() {
    let mut m = rig();
    let mut g = build(&m);
    m.drawables[2].visible = false;
    m.drawables[0].render_order = 99;
    m.drawables[0].opacity = 0.0;
    for v in &mut m.drawables[1].vertices {
        v[1] += 1.0;
    }
    g.update(&m, 0, &FrameView::for_canvas(&m.canvas));

    let eye = g.mesh("eye").unwrap();
    assert!(!eye.visible);
    assert!(g.viewport_of(eye).unwrap().culled);

    let face = g.mesh("face").unwrap();
    assert_eq!(face.z_index, 99);
    assert!(!face.visible);

    let clip = g.mesh("head_clip").unwrap();
    assert_eq!(clip.local_bounds, Rect::new(-50.0, -150.0, 50.0, -50.0));
    let shadow_vp = g.viewport_of(g.mesh("shadow").unwrap()).unwrap();
    assert_eq!(shadow_vp.masks[0].geometry.local_bounds(), clip.local_bounds);
}

#[test]
fn non_positive_pixel_scale_is_a_model_error() {
    let mut m = rig();
    m.canvas.pixels_per_unit = 0.0;
    let shaders = ShaderLibrary::sequential();
    let err = build_render_graph(
        &m,
        &RenderResources {
            shaders: &shaders,
            textures: &TEXTURES,
        },
    )
    .unwrap_err();
    assert!(matches!(err, PuppetryError::Model(_)));
}

#[test]
fn tiny_visible_target_is_not_reported_culled() {
    let mut m = rig();
    m.canvas.pixels_per_unit = 2.0;
    m.drawables[2].vertices = vec![[-0.5, 0.0], [0.5, 0.0], [0.5, 1.0], [-0.5, 1.0]];
    let mut g = build(&m);
    g.update(&m, 0, &FrameView::for_canvas(&m.canvas));
    let vp = g.viewport_of(g.mesh("eye").unwrap()).unwrap();
    assert_eq!(vp.size, MASK_PLACEHOLDER_SIZE);
    assert!(!vp.culled);
}
