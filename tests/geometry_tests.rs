use geometry_renderer::geometry::{load_geometry, parse_geometry, GeometryError};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_geometry_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_minimal_file() {
    let mesh = parse_geometry("[points]\n-0.5 -0.5 1.0 0.0 0.0\n[indices]\n0 0 0\n").unwrap();
    assert_eq!(mesh.vertices, vec![-0.5, -0.5, 1.0, 0.0, 0.0]);
    assert_eq!(mesh.vertices.len(), 5);
    assert_eq!(mesh.indices, vec![0, 0, 0]);
    assert_eq!(mesh.indices.len(), 3);
}

#[test]
fn test_load_from_file() {
    let file = write_geometry_file(
        "# comment\n\
         [points]\n\
         -0.5 -0.5 1.0 0.0 0.0\n\
         0.5 -0.5 0.0 1.0 0.0\n\
         0.0 0.5 0.0 0.0 1.0\n\
         \n\
         [indices]\n\
         0 1 2\n",
    );

    let mesh = load_geometry(file.path()).unwrap();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.triangle_count(), 1);
    assert_eq!(mesh.indices, vec![0, 1, 2]);
}

#[test]
fn test_missing_file() {
    let err = load_geometry("/nonexistent/geometry.geom").unwrap_err();
    assert!(matches!(err, GeometryError::FileNotFound { .. }));
}

#[test]
fn test_four_field_point_line_rejected() {
    let err = parse_geometry("[points]\n-0.5 -0.5 1.0 0.0\n").unwrap_err();
    match err {
        GeometryError::MalformedLine { line, .. } => assert_eq!(line, 2),
        other => panic!("expected MalformedLine, got {other:?}"),
    }
}

#[test]
fn test_two_index_line_rejected() {
    let err = parse_geometry("[points]\n0 0 1 1 1\n[indices]\n0 0\n").unwrap_err();
    assert!(matches!(err, GeometryError::MalformedLine { line: 4, .. }));
}

#[test]
fn test_comments_and_blank_lines_ignored_anywhere() {
    let mesh = parse_geometry(
        "# header comment\n\
         \n\
         [points]\n\
         # inside points\n\
         0.0 0.0 1.0 1.0 1.0\n\
         \n\
         [indices]\n\
         # inside indices\n\
         0 0 0\n\
         \n",
    )
    .unwrap();
    assert_eq!(mesh.vertex_count(), 1);
    assert_eq!(mesh.triangle_count(), 1);
}

#[test]
fn test_crlf_line_endings() {
    let mesh =
        parse_geometry("[points]\r\n0.0 0.0 1.0 1.0 1.0\r\n[indices]\r\n0 0 0\r\n").unwrap();
    assert_eq!(mesh.vertices, vec![0.0, 0.0, 1.0, 1.0, 1.0]);
    assert_eq!(mesh.indices, vec![0, 0, 0]);
}

#[test]
fn test_vertices_keep_file_order() {
    let mesh = parse_geometry(
        "[points]\n\
         1.0 2.0 3.0 4.0 5.0\n\
         6.0 7.0 8.0 9.0 10.0\n\
         [indices]\n\
         0 1 1\n",
    )
    .unwrap();
    assert_eq!(
        mesh.vertices,
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]
    );
}

#[test]
fn test_index_referencing_missing_point_rejected() {
    let err = parse_geometry("[points]\n0 0 1 1 1\n[indices]\n0 0 7\n").unwrap_err();
    assert!(matches!(
        err,
        GeometryError::IndexOutOfRange { index: 7, .. }
    ));
}
