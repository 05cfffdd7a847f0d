//! Wavefront OBJ export for generated meshes

use super::Mesh;
use crate::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Export a mesh to an OBJ file
pub fn export_obj(mesh: &Mesh, path: &Path) -> Result<()> {
    if path.extension().and_then(|e| e.to_str()) != Some("obj") {
        return Err(crate::Error::Export(format!(
            "Expected a .obj path, got {}",
            path.display()
        )));
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_obj(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh as OBJ text to any writer
pub fn write_obj<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<()> {
    writeln!(writer, "# Ember OBJ Export")?;
    writeln!(writer, "# Vertices: {}", mesh.vertex_count())?;
    writeln!(writer, "# Triangles: {}", mesh.triangle_count())?;
    writeln!(writer)?;

    for v in &mesh.vertices {
        writeln!(writer, "v {} {} {}", v.position[0], v.position[1], v.position[2])?;
    }
    for v in &mesh.vertices {
        writeln!(writer, "vt {} {}", v.uv[0], v.uv[1])?;
    }
    for v in &mesh.vertices {
        writeln!(writer, "vn {} {} {}", v.normal[0], v.normal[1], v.normal[2])?;
    }

    // OBJ indices are 1-based
    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] + 1, tri[1] + 1, tri[2] + 1];
        writeln!(writer, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
    }

    Ok(())
}
