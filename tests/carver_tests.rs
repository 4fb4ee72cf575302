use bevy::math::Vec3;
use bevy::prelude::default;
use bevy::image::Image;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy_terrain_export::{
    ExportError, ExportSettings, HeightField, Mask, MaskedMeshCarver, Winding,
};

fn field(n: usize) -> HeightField {
    HeightField::from_fn(n, n, Vec3::new(16.0, 4.0, 16.0), |x, y| {
        ((x * 7 + y * 3) % 5) as f32 / 4.0
    })
    .unwrap()
}

/// Inside where mask x is in the left half.
fn half_mask() -> Mask {
    Mask::from_fn(8, 8, |x, _| if x < 4 { 1.0 } else { 0.0 }).unwrap()
}

fn checker_mask() -> Mask {
    Mask::from_fn(5, 3, |x, y| ((x + y) % 2) as f32).unwrap()
}

#[test]
fn interior_and_exterior_partition_all_cells() {
    let field = field(9);
    for mask in [half_mask(), checker_mask()] {
        let carver = MaskedMeshCarver::new();
        let carved = carver.carve(Some(&field), &mask).unwrap();
        let membership = carver.classify(&field, &mask).unwrap();
        let inside = membership.iter().filter(|m| **m).count();

        assert_eq!(membership.len(), 8 * 8);
        assert_eq!(carved.cell_count(), 64);
        assert_eq!(carved.interior_cells(), inside);
        assert_eq!(carved.exterior_cells(), 64 - inside);
        assert_eq!(carved.interior.triangle_count(), 2 * inside);
        assert_eq!(carved.exterior.triangle_count(), 2 * (64 - inside));
    }
}

#[test]
fn half_mask_splits_grid_in_two() {
    let carved = MaskedMeshCarver::new()
        .carve(Some(&field(9)), &half_mask())
        .unwrap();
    assert_eq!(carved.interior_cells(), 32);
    assert_eq!(carved.exterior_cells(), 32);
    // Four cell columns plus one shared edge column, nine rows.
    assert_eq!(carved.interior.vertex_count(), 5 * 9);
    assert_eq!(carved.exterior.vertex_count(), 5 * 9);
}

#[test]
fn invert_swaps_interior_and_exterior() {
    let field = field(9);
    let carver = MaskedMeshCarver::new();
    let plain = carver.carve(Some(&field), &half_mask()).unwrap();
    let inverted = carver
        .carve(Some(&field), &half_mask().with_invert(true))
        .unwrap();

    assert_eq!(plain.interior, inverted.exterior);
    assert_eq!(plain.exterior, inverted.interior);
}

#[test]
fn invert_swaps_which_mesh_is_empty() {
    let field = field(5);
    let full = Mask::new(1, 1, vec![1.0]).unwrap();
    let carver = MaskedMeshCarver::new();

    let carved = carver.carve(Some(&field), &full).unwrap();
    assert!(!carved.interior.is_empty());
    assert!(carved.exterior.is_empty());

    let carved = carver.carve(Some(&field), &full.with_invert(true)).unwrap();
    assert!(carved.interior.is_empty());
    assert!(!carved.exterior.is_empty());
}

#[test]
fn sub_mesh_indices_are_valid() {
    let carved = MaskedMeshCarver::new()
        .with_stride_level(1)
        .carve(Some(&field(17)), &checker_mask())
        .unwrap();
    for mesh in [&carved.interior, &carved.exterior] {
        assert_eq!(mesh.uvs.len(), mesh.vertex_count());
        assert_eq!(mesh.normals.len(), mesh.vertex_count());
        assert!(
            mesh.indices
                .iter()
                .all(|&i| (i as usize) < mesh.vertex_count())
        );
    }
}

#[test]
fn winding_controls_face_orientation() {
    let flat = HeightField::flat(5, 5, Vec3::ONE).unwrap();
    let mask = Mask::new(1, 1, vec![1.0]).unwrap();

    let ccw = MaskedMeshCarver::new()
        .with_winding(Winding::CounterClockwise)
        .carve(Some(&flat), &mask)
        .unwrap();
    assert!(ccw.interior.normals.iter().all(|n| (*n - Vec3::Y).length() < 1e-6));

    let cw = MaskedMeshCarver::new()
        .with_winding(Winding::Clockwise)
        .carve(Some(&flat), &mask)
        .unwrap();
    assert!(cw.interior.normals.iter().all(|n| (*n + Vec3::Y).length() < 1e-6));
}

#[test]
fn missing_height_data_is_fatal() {
    let result = MaskedMeshCarver::new().carve(None, &half_mask());
    assert!(matches!(result, Err(ExportError::MissingHeightData)));
}

#[test]
fn carver_reads_settings() {
    let settings = ExportSettings {
        carve_stride_level: 2,
        carve_winding: Winding::Clockwise,
        ..ExportSettings::default()
    };
    let carved = MaskedMeshCarver::from_settings(&settings)
        .carve(Some(&field(17)), &half_mask())
        .unwrap();
    assert_eq!(carved.cell_count(), 4 * 4);
}

#[test]
fn mask_resample_keeps_membership() {
    let mask = half_mask().with_invert(true);
    let resampled = mask.resampled(16, 2).unwrap();
    assert_eq!(resampled.width(), 16);
    assert!(resampled.is_inverted());

    let field = field(9);
    let carver = MaskedMeshCarver::new();
    assert_eq!(
        carver.classify(&field, &mask).unwrap(),
        carver.classify(&field, &resampled).unwrap()
    );
}

#[test]
fn mask_rejects_bad_dimensions() {
    assert!(matches!(
        Mask::new(0, 3, Vec::new()),
        Err(ExportError::InvalidInput(_))
    ));
    assert!(matches!(
        Mask::new(2, 2, vec![0.0; 3]),
        Err(ExportError::InvalidInput(_))
    ));
}

#[test]
fn mask_from_image_uses_luminance() {
    let raw = vec![255, 255, 255, 255, 0, 0, 0, 255];
    let image = Image::new(
        Extent3d {
            width: 2,
            height: 1,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        raw,
        TextureFormat::Rgba8Unorm,
        default(),
    );
    let mask = Mask::from_image(&image, false).unwrap();
    let membership = MaskedMeshCarver::new()
        .classify(&field(5), &mask)
        .unwrap();
    // Mask x follows grid x: the first two cell columns are white.
    for (cell, inside) in membership.iter().enumerate() {
        assert_eq!(*inside, cell % 4 < 2, "cell {cell}");
    }
}
