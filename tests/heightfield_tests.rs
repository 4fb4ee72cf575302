use bevy::math::{Vec2, Vec3};
use bevy_terrain_export::{ExportError, HeightField, MAX_STRIDE_LEVEL, reduced_dimension};

#[test]
fn reduced_grid_for_513_at_stride_level_2() {
    assert_eq!(reduced_dimension(513, 4), 129);

    let field = HeightField::flat(513, 513, Vec3::new(1000.0, 600.0, 1000.0)).unwrap();
    let sampler = field.sampler(2).unwrap();
    assert_eq!(sampler.stride(), 4);
    assert_eq!(sampler.width(), 129);
    assert_eq!(sampler.height(), 129);
}

#[test]
fn reduced_grid_follows_integer_division() {
    for n in [2usize, 3, 5, 9, 10, 17, 33, 100] {
        let field = HeightField::flat(n, n, Vec3::ONE).unwrap();
        for level in 0..5u32 {
            let sampler = field.sampler(level).unwrap();
            assert_eq!(sampler.width(), (n - 1) / (1 << level) + 1);
            assert_eq!(sampler.height(), sampler.width());
        }
    }
}

#[test]
fn sampler_picks_nearest_strided_sample() {
    let field = HeightField::from_fn(9, 9, Vec3::ONE, |x, y| (y * 100 + x) as f32).unwrap();
    let sampler = field.sampler(1).unwrap();
    assert_eq!(sampler.height_at(0, 0), 0.0);
    assert_eq!(sampler.height_at(1, 0), 2.0);
    assert_eq!(sampler.height_at(2, 3), 604.0);
    assert_eq!(sampler.height_at(4, 4), 808.0);
}

#[test]
fn mesh_scale_preserves_world_extent() {
    let field = HeightField::flat(65, 65, Vec3::new(128.0, 50.0, 64.0)).unwrap();
    let sampler = field.sampler(3).unwrap();
    assert_eq!(sampler.mesh_scale(), Vec3::new(16.0, 50.0, 8.0));
    assert_eq!(sampler.uv_scale(), Vec2::splat(1.0 / 64.0));
    assert_eq!(sampler.vertex_uv(8, 8), Vec2::ONE);
}

#[test]
fn rejects_zero_dimensions() {
    let result = HeightField::new(0, 4, Vec::new(), Vec3::ONE);
    assert!(matches!(result, Err(ExportError::InvalidInput(_))));
    let result = HeightField::flat(4, 0, Vec3::ONE);
    assert!(matches!(result, Err(ExportError::InvalidInput(_))));
}

#[test]
fn rejects_mismatched_sample_count() {
    let result = HeightField::new(3, 3, vec![0.0; 8], Vec3::ONE);
    assert!(matches!(result, Err(ExportError::InvalidInput(_))));
}

#[test]
fn rejects_non_finite_size() {
    let result = HeightField::flat(3, 3, Vec3::new(f32::NAN, 1.0, 1.0));
    assert!(matches!(result, Err(ExportError::InvalidInput(_))));
}

#[test]
fn rejects_stride_level_above_maximum() {
    let field = HeightField::flat(3, 3, Vec3::ONE).unwrap();
    assert!(field.sampler(MAX_STRIDE_LEVEL).is_ok());
    assert!(matches!(
        field.sampler(MAX_STRIDE_LEVEL + 1),
        Err(ExportError::InvalidInput(_))
    ));
}

#[test]
fn max_sample_finds_peak() {
    let field = HeightField::from_fn(4, 4, Vec3::ONE, |x, y| if x == 3 && y == 1 { 0.9 } else { 0.1 })
        .unwrap();
    assert_eq!(field.max_sample(), 0.9);
}
