use std::hint::black_box;

use bevy::math::Vec3;
use bevy_terrain_export::{
    ColorBuffer, EdgeMode, HeightField, LodParameters, Mask, MaskedMeshCarver, TerrainMeshBuilder,
};
use criterion::{Criterion, criterion_group, criterion_main};

fn wavy_field(n: usize) -> HeightField {
    HeightField::from_fn(n, n, Vec3::new(256.0, 40.0, 256.0), |x, y| {
        ((x + y) as f32 * 0.1).sin() * 0.5 + 0.5
    })
    .expect("valid height field")
}

fn bench_mesh_generation(c: &mut Criterion) {
    let field = wavy_field(257);

    c.bench_function("TerrainMeshBuilder 257x257 smooth", |b| {
        b.iter(|| {
            TerrainMeshBuilder::new()
                .with_lod(LodParameters::at_stride(0))
                .build(black_box(&field))
        });
    });

    c.bench_function("TerrainMeshBuilder 257x257 sharp stride 1", |b| {
        b.iter(|| {
            TerrainMeshBuilder::new()
                .with_lod(LodParameters::at_stride(1).with_edge_mode(EdgeMode::Sharp))
                .build(black_box(&field))
        });
    });

    let colors = ColorBuffer::from_fn(256, 256, |x, y| {
        [x as f32 / 255.0, y as f32 / 255.0, 0.5, 1.0]
    })
    .expect("valid colour buffer");
    c.bench_function("TerrainMeshBuilder 257x257 vertex colours, 4 passes", |b| {
        b.iter(|| {
            TerrainMeshBuilder::new()
                .with_lod(LodParameters::at_stride(0).with_vertex_colors(4))
                .with_color_source(&colors)
                .build(black_box(&field))
        });
    });
}

fn bench_carving(c: &mut Criterion) {
    let field = wavy_field(257);
    let mask = Mask::from_fn(128, 128, |x, y| {
        let dx = x as f32 - 64.0;
        let dy = y as f32 - 64.0;
        if dx * dx + dy * dy < 40.0 * 40.0 { 1.0 } else { 0.0 }
    })
    .expect("valid mask");

    c.bench_function("MaskedMeshCarver 257x257 disc", |b| {
        b.iter(|| MaskedMeshCarver::new().carve(Some(black_box(&field)), &mask));
    });
}

criterion_group!(benches, bench_mesh_generation, bench_carving);
criterion_main!(benches);
