//! Mesh Tests
//!
//! Tests for:
//! - Index expansion of points and normals
//! - Update ordering: points before indices, indices before points
//! - Invalid index buffers
//! - Generic attributes: `st` alias, dimensions, reserved names
//! - Transforms: row-major input, no accumulation, auto-update disabled
//! - Material binding: deferred when the material does not exist yet
//! - Commit: dirty flags gate every publish

use std::sync::Arc;

use glam::{Mat4, Vec3, Vec4};
use myth_hydra::delegate::{DirtyFlags, Mesh};
use myth_hydra::errors::DelegateError;
use myth_hydra::{MemoryFileProvider, RenderDelegate, DelegateSettings};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn delegate() -> RenderDelegate {
    init_logger();
    RenderDelegate::new(
        DelegateSettings::new("scene.usda"),
        Arc::new(MemoryFileProvider::new()),
    )
}

fn new_mesh<'a>(delegate: &'a mut RenderDelegate, id: &str) -> &'a mut Mesh {
    delegate.create_renderable_prim("mesh", id, "").unwrap()
}

fn attribute(mesh: &Mesh, name: &str) -> Option<Vec<f32>> {
    mesh.geometry().get_attribute(name).map(|attr| attr.to_f32_vec())
}

const QUAD_POINTS: [f32; 12] = [
    0.0, 0.0, 0.0, //
    1.0, 0.0, 0.0, //
    1.0, 1.0, 0.0, //
    0.0, 1.0, 0.0,
];
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

fn expected_expansion(points: &[f32], indices: &[u32]) -> Vec<f32> {
    let mut out = Vec::new();
    for &i in indices {
        for k in 0..3 {
            out.push(points[3 * i as usize + k]);
        }
    }
    out
}

// ============================================================================
// Index Expansion
// ============================================================================

#[test]
fn indices_then_points_expands_positions() {
    let mut delegate = delegate();
    let mesh = new_mesh(&mut delegate, "/quad");

    mesh.set_indices(&QUAD_INDICES);
    mesh.set_points(&QUAD_POINTS);

    let position = attribute(mesh, "position").unwrap();
    assert_eq!(position.len(), 3 * QUAD_INDICES.len());
    assert_eq!(position, expected_expansion(&QUAD_POINTS, &QUAD_INDICES));
    assert_eq!(mesh.geometry().vertex_count(), 6);
}

#[test]
fn points_before_indices_produce_no_position() {
    let mut delegate = delegate();
    let mesh = new_mesh(&mut delegate, "/quad");

    mesh.set_points(&QUAD_POINTS);
    assert!(attribute(mesh, "position").is_none());

    mesh.set_indices(&QUAD_INDICES);
    assert_eq!(
        attribute(mesh, "position").unwrap(),
        expected_expansion(&QUAD_POINTS, &QUAD_INDICES)
    );
}

#[test]
fn normals_follow_the_index_buffer() {
    let mut delegate = delegate();
    let mesh = new_mesh(&mut delegate, "/quad");
    let normals = [
        0.0, 0.0, 1.0, //
        0.0, 1.0, 0.0, //
        1.0, 0.0, 0.0, //
        0.0, 0.0, -1.0,
    ];

    mesh.set_normals(&normals);
    mesh.set_indices(&QUAD_INDICES);

    assert_eq!(
        attribute(mesh, "normal").unwrap(),
        expected_expansion(&normals, &QUAD_INDICES)
    );
}

#[test]
fn replacing_indices_rederives_everything() {
    let mut delegate = delegate();
    let mesh = new_mesh(&mut delegate, "/quad");
    mesh.set_indices(&QUAD_INDICES);
    mesh.set_points(&QUAD_POINTS);

    let reversed = [3, 2, 0];
    mesh.set_indices(&reversed);

    assert_eq!(mesh.indices(), Some(&reversed[..]));
    assert_eq!(
        attribute(mesh, "position").unwrap(),
        expected_expansion(&QUAD_POINTS, &reversed)
    );
}

#[test]
fn out_of_range_index_drops_the_attribute() {
    let mut delegate = delegate();
    let mesh = new_mesh(&mut delegate, "/quad");
    mesh.set_indices(&QUAD_INDICES);
    mesh.set_points(&QUAD_POINTS);
    assert!(attribute(mesh, "position").is_some());

    mesh.set_indices(&[0, 1, 9]);
    assert!(attribute(mesh, "position").is_none());

    // A consistent update brings it back.
    mesh.set_indices(&[0, 1, 2]);
    assert_eq!(attribute(mesh, "position").unwrap().len(), 9);
}

#[test]
fn points_are_copied_not_aliased() {
    let mut delegate = delegate();
    let mesh = new_mesh(&mut delegate, "/quad");
    let mut points = QUAD_POINTS.to_vec();

    mesh.set_points(&points);
    points[0] = 42.0;

    assert_eq!(mesh.points().unwrap()[0], 0.0);
}

// ============================================================================
// Generic Attributes
// ============================================================================

#[test]
fn st_is_stored_as_uv() {
    let mut delegate = delegate();
    let mesh = new_mesh(&mut delegate, "/quad");
    let uvs = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0];

    mesh.set_generic_attribute("st", &uvs, 2).unwrap();

    let uv = mesh.geometry().get_attribute("uv").unwrap();
    assert_eq!(uv.format, wgpu::VertexFormat::Float32x2);
    assert_eq!(uv.count, 3);
    assert_eq!(uv.to_f32_vec(), uvs);
    assert!(mesh.geometry().get_attribute("st").is_none());
}

#[test]
fn generic_attributes_are_not_reordered() {
    let mut delegate = delegate();
    let mesh = new_mesh(&mut delegate, "/quad");
    mesh.set_indices(&[2, 1, 0]);
    let colors = [0.1, 0.2, 0.3];

    mesh.set_generic_attribute("displayOpacity", &colors, 1).unwrap();

    assert_eq!(attribute(mesh, "displayOpacity").unwrap(), colors);
}

#[test]
fn unsupported_dimension_is_rejected() {
    let mut delegate = delegate();
    let mesh = new_mesh(&mut delegate, "/quad");

    let err = mesh.set_generic_attribute("weird", &[0.0; 10], 5).unwrap_err();

    assert_eq!(
        err,
        DelegateError::UnsupportedAttributeDimension {
            name: "weird".to_string(),
            dimension: 5
        }
    );
    assert!(mesh.geometry().attributes().is_empty());
    assert!(mesh.dirty_flags().is_empty());
}

#[test]
fn reserved_names_are_ignored_by_generic_path() {
    let mut delegate = delegate();
    let mesh = new_mesh(&mut delegate, "/quad");
    mesh.set_indices(&QUAD_INDICES);
    mesh.set_points(&QUAD_POINTS);
    let before = attribute(mesh, "position").unwrap();

    mesh.set_generic_attribute("points", &[9.0; 3], 3).unwrap();
    mesh.set_generic_attribute("position", &[9.0; 3], 3).unwrap();
    mesh.set_generic_attribute("normals", &[9.0; 3], 3).unwrap();

    assert_eq!(attribute(mesh, "position").unwrap(), before);
    assert!(attribute(mesh, "normal").is_none());
}

// ============================================================================
// Transform
// ============================================================================

#[rustfmt::skip]
fn translation_row_major(t: Vec3) -> [f32; 16] {
    [
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        t.x, t.y, t.z, 1.0,
    ]
}

#[test]
fn row_major_translation_lands_in_last_column() {
    let mut delegate = delegate();
    let mesh = new_mesh(&mut delegate, "/quad");

    mesh.set_transform(&translation_row_major(Vec3::new(1.0, 2.0, 3.0)));

    assert_eq!(mesh.transform(), Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)));
    assert!(!mesh.matrix_auto_update());
}

#[test]
fn second_transform_replaces_the_first() {
    let mut delegate = delegate();
    let mesh = new_mesh(&mut delegate, "/quad");

    mesh.set_transform(&translation_row_major(Vec3::new(5.0, 0.0, 0.0)));
    mesh.set_transform(&translation_row_major(Vec3::new(0.0, 1.0, 0.0)));

    assert_eq!(mesh.transform(), Mat4::from_translation(Vec3::Y));
}

#[test]
fn committed_transform_disables_auto_update() {
    let mut delegate = delegate();
    let mesh = new_mesh(&mut delegate, "/quad");
    let key = mesh.key();
    mesh.set_transform(&translation_row_major(Vec3::new(0.0, 0.0, -4.0)));

    delegate.commit_resources();

    let scene = delegate.scene().read();
    let target = scene.get_mesh(key).unwrap();
    assert_eq!(target.matrix.w_axis, Vec4::new(0.0, 0.0, -4.0, 1.0));
    assert!(!target.matrix_auto_update);
}

// ============================================================================
// Material Binding
// ============================================================================

#[test]
fn binding_unknown_material_is_a_noop() {
    let mut delegate = delegate();
    let mesh = new_mesh(&mut delegate, "/quad");

    mesh.set_material_binding("/Looks/Missing");

    assert!(mesh.material().is_none());
    assert!(mesh.material_id().is_none());
    assert!(!mesh.dirty_flags().contains(DirtyFlags::MATERIAL));
}

#[test]
fn binding_existing_material_publishes_its_handle() {
    let mut delegate = delegate();
    let handle = delegate
        .create_shading_prim("material", "/Looks/Wood")
        .map(|m| Arc::clone(m.handle()))
        .unwrap();
    let mesh = new_mesh(&mut delegate, "/quad");
    let key = mesh.key();

    mesh.set_material_binding("/Looks/Wood");
    assert_eq!(mesh.material_id(), Some("/Looks/Wood"));
    delegate.commit_resources();

    let scene = delegate.scene().read();
    assert!(Arc::ptr_eq(&scene.get_mesh(key).unwrap().material, &handle));
}

// ============================================================================
// Commit
// ============================================================================

#[test]
fn nothing_is_published_before_commit() {
    let mut delegate = delegate();
    let mesh = new_mesh(&mut delegate, "/quad");
    let key = mesh.key();
    mesh.set_indices(&QUAD_INDICES);
    mesh.set_points(&QUAD_POINTS);

    assert!(mesh.dirty_flags().contains(DirtyFlags::GEOMETRY));
    assert!(delegate.scene().read().get_mesh(key).unwrap().geometry.is_none());
}

#[test]
fn commit_clears_flags_and_computes_bounds() {
    let mut delegate = delegate();
    let mesh = new_mesh(&mut delegate, "/quad");
    let key = mesh.key();
    mesh.set_indices(&QUAD_INDICES);
    mesh.set_points(&QUAD_POINTS);

    delegate.commit_resources();

    assert!(delegate.mesh("/quad").unwrap().dirty_flags().is_empty());
    let scene = delegate.scene().read();
    let geometry = scene.get_mesh(key).unwrap().geometry.clone().unwrap();
    let bounds = geometry.bounding_box.unwrap();
    assert_eq!(bounds.min, Vec3::ZERO);
    assert_eq!(bounds.max, Vec3::new(1.0, 1.0, 0.0));
}

#[test]
fn repeated_commit_without_updates_is_idempotent() {
    let mut delegate = delegate();
    let mesh = new_mesh(&mut delegate, "/quad");
    let key = mesh.key();
    mesh.set_indices(&QUAD_INDICES);
    mesh.set_points(&QUAD_POINTS);

    delegate.commit_resources();
    let first = delegate.scene().read().get_mesh(key).unwrap().geometry.clone().unwrap();
    delegate.commit_resources();
    let second = delegate.scene().read().get_mesh(key).unwrap().geometry.clone().unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    delegate.mesh_mut("/quad").unwrap().set_points(&[0.0; 12]);
    delegate.commit_resources();
    let third = delegate.scene().read().get_mesh(key).unwrap().geometry.clone().unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
}

#[test]
fn transform_only_commit_keeps_geometry() {
    let mut delegate = delegate();
    let mesh = new_mesh(&mut delegate, "/quad");
    let key = mesh.key();
    mesh.set_indices(&QUAD_INDICES);
    mesh.set_points(&QUAD_POINTS);
    delegate.commit_resources();
    let before = delegate.scene().read().get_mesh(key).unwrap().geometry.clone().unwrap();

    delegate
        .mesh_mut("/quad")
        .unwrap()
        .set_transform(&translation_row_major(Vec3::X));
    assert_eq!(
        delegate.mesh("/quad").unwrap().dirty_flags(),
        DirtyFlags::TRANSFORM
    );
    delegate.commit_resources();

    let scene = delegate.scene().read();
    let target = scene.get_mesh(key).unwrap();
    assert!(Arc::ptr_eq(&before, target.geometry.as_ref().unwrap()));
    assert_eq!(target.matrix, Mat4::from_translation(Vec3::X));
}
