//! Loads 2D colored geometry from a line-oriented text format.
//!
//! Two sections, `[points]` and `[indices]`; a data line belongs to whichever
//! header most recently preceded it. `#` comments and blank lines are ignored
//! anywhere.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("could not open geometry file {path}: {source}")]
    FileNotFound {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },
    #[error("line {line}: index {index} out of range for {point_count} points")]
    IndexOutOfRange {
        line: usize,
        index: u16,
        point_count: usize,
    },
}

/// Floats per `[points]` line: x y r g b.
pub const FLOATS_PER_VERTEX: usize = 5;
/// Indices per `[indices]` line: one triangle.
pub const INDICES_PER_TRIANGLE: usize = 3;

/// Parsed geometry, flat in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / INDICES_PER_TRIANGLE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Points,
    Indices,
}

/// Load and parse a geometry file.
pub fn load_geometry<P: AsRef<Path>>(path: P) -> Result<MeshData, GeometryError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| GeometryError::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = parse_geometry(&text)?;
    log::info!(
        "loaded geometry from {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Parse geometry text. Section state machine starting outside any section.
pub fn parse_geometry(text: &str) -> Result<MeshData, GeometryError> {
    let mut section = Section::None;
    let mut mesh = MeshData::default();
    // Source line of each index triple, kept for range errors reported after
    // the whole file is read (sections may appear in any order).
    let mut triple_lines: Vec<usize> = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        match line.trim() {
            "[points]" => {
                section = Section::Points;
                continue;
            }
            "[indices]" => {
                section = Section::Indices;
                continue;
            }
            _ => {}
        }

        match section {
            Section::None => {
                return Err(GeometryError::MalformedLine {
                    line: line_no,
                    reason: format!("data before any section header: {line:?}"),
                });
            }
            Section::Points => {
                parse_fields::<f32>(line, line_no, FLOATS_PER_VERTEX, &mut mesh.vertices)?;
            }
            Section::Indices => {
                parse_fields::<u16>(line, line_no, INDICES_PER_TRIANGLE, &mut mesh.indices)?;
                triple_lines.push(line_no);
            }
        }
    }

    let point_count = mesh.vertex_count();
    for (triple, &line) in mesh.indices.chunks(INDICES_PER_TRIANGLE).zip(&triple_lines) {
        for &index in triple {
            if index as usize >= point_count {
                return Err(GeometryError::IndexOutOfRange {
                    line,
                    index,
                    point_count,
                });
            }
        }
    }

    Ok(mesh)
}

fn parse_fields<T: std::str::FromStr>(
    line: &str,
    line_no: usize,
    expected: usize,
    out: &mut Vec<T>,
) -> Result<(), GeometryError> {
    let mut count = 0;
    for field in line.split_whitespace() {
        let value = field.parse::<T>().map_err(|_| GeometryError::MalformedLine {
            line: line_no,
            reason: format!("could not parse field {field:?}"),
        })?;
        out.push(value);
        count += 1;
    }
    if count != expected {
        out.truncate(out.len() - count);
        return Err(GeometryError::MalformedLine {
            line: line_no,
            reason: format!("expected {expected} fields, found {count}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_in_reverse_order() {
        let text = "[indices]\n0 1 2\n[points]\n0 0 1 0 0\n1 0 0 1 0\n0 1 0 0 1\n";
        let mesh = parse_geometry(text).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_data_before_header_rejected() {
        let err = parse_geometry("0.0 0.0 1.0 1.0 1.0\n").unwrap_err();
        assert!(matches!(err, GeometryError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = parse_geometry("[points]\n0.0 0.0 one 1.0 1.0\n").unwrap_err();
        assert!(matches!(err, GeometryError::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn test_index_out_of_range() {
        let text = "[points]\n0 0 1 0 0\n1 0 0 1 0\n0 1 0 0 1\n[indices]\n0 1 3\n";
        let err = parse_geometry(text).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::IndexOutOfRange {
                line: 6,
                index: 3,
                point_count: 3
            }
        ));
    }
}
