use std::fmt::Write as _;
use std::io;

use crate::mesh::TriangleBuffer;

use super::write_string;

/// Renders a buffer as Wavefront OBJ text (positions, uvs, normals, faces).
pub fn mesh_to_obj(buffer: &TriangleBuffer, name: &str) -> String {
    let mut obj = String::new();
    // writing to a String cannot fail
    let _ = writeln!(obj, "o {name}");
    for p in &buffer.positions {
        let _ = writeln!(obj, "v {} {} {}", p[0], p[1], p[2]);
    }
    for uv in &buffer.uvs {
        let _ = writeln!(obj, "vt {} {}", uv[0], uv[1]);
    }
    for n in &buffer.normals {
        let _ = writeln!(obj, "vn {} {} {}", n[0], n[1], n[2]);
    }
    for tri in buffer.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] + 1, tri[1] + 1, tri[2] + 1];
        let _ = writeln!(obj, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}");
    }
    obj
}

pub fn write_mesh_obj(path: &str, buffer: &TriangleBuffer, name: &str) -> io::Result<()> {
    write_string(path, &mesh_to_obj(buffer, name))
}

pub fn write_mesh_json(path: &str, buffer: &TriangleBuffer) -> io::Result<()> {
    let json = serde_json::to_string(buffer).map_err(io::Error::other)?;
    write_string(path, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obj_uses_one_based_indices() {
        let buffer = TriangleBuffer {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            uvs: vec![[0.0, 0.0]; 3],
            colors: vec![[1.0; 4]; 3],
            indices: vec![0, 1, 2],
        };
        let obj = mesh_to_obj(&buffer, "mark");
        assert!(obj.starts_with("o mark\n"));
        assert_eq!(obj.lines().filter(|l| l.starts_with("v ")).count(), 3);
        assert!(obj.contains("f 1/1/1 2/2/2 3/3/3"));
    }
}
