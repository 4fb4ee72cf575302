//! Wavefront OBJ output for terrain meshes.
//!
//! Writes one `v`, `vt` or `f` record per line with 1-based indices and `\n`
//! line endings. Faces reference the position and UV with the same index
//! (`f 1/1 2/2 3/3`) since every vertex carries exactly one UV.

use std::io::Write;

use crate::error::Result;
use crate::heightfield::HeightField;
use crate::mesh::TerrainMesh;

/// Writes a triangle mesh as OBJ.
pub fn write_obj(mesh: &TerrainMesh, mut writer: impl Write) -> Result<()> {
    writeln!(writer, "# terrain mesh")?;
    writeln!(writer, "# vertices: {}", mesh.vertex_count())?;
    writeln!(writer, "# triangles: {}", mesh.triangle_count())?;

    for p in &mesh.positions {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for uv in &mesh.uvs {
        writeln!(writer, "vt {} {}", uv.x, uv.y)?;
    }
    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] + 1, tri[1] + 1, tri[2] + 1];
        writeln!(writer, "f {a}/{a} {b}/{b} {c}/{c}")?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes the height field at `stride_level` as an OBJ of quad faces.
///
/// Vertices and UVs are laid out exactly as [`crate::TerrainMeshBuilder`]
/// lays them out; each grid cell becomes one face
/// `(x, y), (x, y + 1), (x + 1, y + 1), (x + 1, y)`.
pub fn write_quad_obj(field: &HeightField, stride_level: u32, mut writer: impl Write) -> Result<()> {
    let sampler = field.sampler(stride_level)?;
    let (w, h) = (sampler.width(), sampler.height());

    writeln!(writer, "# terrain quads")?;
    writeln!(writer, "# vertices: {}", sampler.vertex_count())?;
    writeln!(writer, "# quads: {}", sampler.cell_count())?;

    for y in 0..h {
        for x in 0..w {
            let p = sampler.vertex_position(x, y);
            writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
        }
    }
    for y in 0..h {
        for x in 0..w {
            let uv = sampler.vertex_uv(x, y);
            writeln!(writer, "vt {} {}", uv.x, uv.y)?;
        }
    }
    for y in 0..h.saturating_sub(1) {
        for x in 0..w.saturating_sub(1) {
            let a = sampler.vertex_index(x, y) + 1;
            let b = sampler.vertex_index(x, y + 1) + 1;
            let c = sampler.vertex_index(x + 1, y + 1) + 1;
            let d = sampler.vertex_index(x + 1, y) + 1;
            writeln!(writer, "f {a}/{a} {b}/{b} {c}/{c} {d}/{d}")?;
        }
    }

    writer.flush()?;
    Ok(())
}
