/// STL file parser for binary and ASCII formats
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::many0,
    number::complete::float,
    sequence::preceded,
    IResult,
};
use thiserror::Error;

use crate::geometry::{Mesh, Triangle, Vertex};

/// Errors produced while decoding an STL source
#[derive(Debug, Error)]
pub enum StlError {
    #[error("file too small to be a valid STL ({0} bytes)")]
    TooSmall(usize),
    #[error("binary STL truncated: {expected} bytes needed for {triangles} triangles, got {actual}")]
    Truncated {
        triangles: usize,
        expected: usize,
        actual: usize,
    },
    #[error("failed to parse ASCII STL: {0}")]
    InvalidAscii(String),
}

const BINARY_HEADER_LEN: usize = 80;
const BINARY_TRIANGLE_LEN: usize = 50;

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, StlError> {
    if data.len() < BINARY_HEADER_LEN + 4 {
        return Err(StlError::TooSmall(data.len()));
    }

    // Skip 80-byte header, read triangle count (4 bytes, little-endian)
    let body = &data[BINARY_HEADER_LEN..];
    let triangle_count = u32::from_le_bytes([body[0], body[1], body[2], body[3]]) as usize;

    let expected = BINARY_HEADER_LEN + 4 + triangle_count * BINARY_TRIANGLE_LEN;
    if data.len() < expected {
        return Err(StlError::Truncated {
            triangles: triangle_count,
            expected,
            actual: data.len(),
        });
    }

    let mut mesh = Mesh::with_capacity(triangle_count);
    let mut offset = 4;

    for _ in 0..triangle_count {
        let normal = read_vec3(body, offset);
        offset += 12;

        let mut vertices = [Vertex::new(0.0, 0.0, 0.0, normal.0, normal.1, normal.2); 3];
        for vertex in &mut vertices {
            let (x, y, z) = read_vec3(body, offset);
            *vertex = Vertex::new(x, y, z, normal.0, normal.1, normal.2);
            offset += 12;
        }

        // Skip attribute byte count
        offset += 2;

        mesh.add_triangle(Triangle::new(vertices[0], vertices[1], vertices[2]));
    }

    Ok(mesh)
}

fn read_vec3(data: &[u8], offset: usize) -> (f32, f32, f32) {
    let f = |o: usize| f32::from_le_bytes([data[o], data[o + 1], data[o + 2], data[o + 3]]);
    (f(offset), f(offset + 4), f(offset + 8))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, StlError> {
    match parse_ascii_stl_impl(input) {
        Ok((_, mesh)) => Ok(mesh),
        Err(e) => Err(StlError::InvalidAscii(e.to_string())),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Mesh> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = not_line_ending(input)?; // Optional name
    let (input, triangles) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;

    let mut mesh = Mesh::with_capacity(triangles.len());
    for triangle in triangles {
        mesh.add_triangle(triangle);
    }

    Ok((input, mesh))
}

fn parse_facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_vertex(input, normal)?;
    let (input, v2) = parse_vertex(input, normal)?;
    let (input, v3) = parse_vertex(input, normal)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, Triangle::new(v1, v2, v3)))
}

fn parse_vertex(input: &str, normal: (f32, f32, f32)) -> IResult<&str, Vertex> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    let (input, (x, y, z)) = parse_vector3(input)?;
    Ok((input, Vertex::new(x, y, z, normal.0, normal.1, normal.2)))
}

fn parse_vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, (x, y, z)))
}

/// Detect and parse an STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh, StlError> {
    // A "solid" prefix suggests ASCII, but binary files may carry it in the
    // header too, so fall back to binary when the ASCII grammar rejects it
    if data.len() > 5 && &data[0..5] == b"solid" {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_fixture(triangles: &[[f32; 12]]) -> Vec<u8> {
        let mut data = vec![0u8; 80];
        data.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for t in triangles {
            for value in t {
                data.extend_from_slice(&value.to_le_bytes());
            }
            data.extend_from_slice(&0u16.to_le_bytes());
        }
        data
    }

    #[test]
    fn test_parse_binary_empty() {
        let data = binary_fixture(&[]);
        let mesh = parse_binary_stl(&data).unwrap();
        assert_eq!(mesh.triangles.len(), 0);
    }

    #[test]
    fn test_parse_binary_triangle() {
        let data = binary_fixture(&[[
            0.0, 0.0, 1.0, // normal
            0.0, 0.0, 0.0, // v0
            1.0, 0.0, 0.0, // v1
            0.0, 1.0, 0.0, // v2
        ]]);

        let mesh = parse_binary_stl(&data).unwrap();
        assert_eq!(mesh.triangles.len(), 1);

        let tri = &mesh.triangles[0];
        assert!((tri.vertices[1].position.x - 1.0).abs() < 1e-6);
        assert!((tri.vertices[0].normal.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_binary_too_small() {
        assert!(matches!(
            parse_binary_stl(&[0u8; 10]),
            Err(StlError::TooSmall(10))
        ));
    }

    #[test]
    fn test_binary_truncated() {
        let mut data = vec![0u8; 84];
        data[80..84].copy_from_slice(&3u32.to_le_bytes());

        match parse_binary_stl(&data) {
            Err(StlError::Truncated { triangles, .. }) => assert_eq!(triangles, 3),
            _ => panic!("expected truncation error"),
        }
    }

    #[test]
    fn test_parse_ascii() {
        let input = "\
solid pyramid
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid pyramid
";
        let mesh = parse_ascii_stl(input).unwrap();
        assert_eq!(mesh.triangles.len(), 1);
        assert!((mesh.triangles[0].vertices[2].position.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_ascii_negative_and_exponent() {
        let input = "solid s\n facet normal 0 0 1\n outer loop\n vertex -1.5e1 0 0\n vertex 0 2.5 0\n vertex 0 0 1e-2\n endloop\n endfacet\nendsolid";
        let mesh = parse_ascii_stl(input).unwrap();
        assert!((mesh.triangles[0].vertices[0].position.x + 15.0).abs() < 1e-4);
        assert!((mesh.triangles[0].vertices[2].position.z - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_detect_ascii_then_binary() {
        let ascii = b"solid empty\nendsolid empty\n";
        assert_eq!(parse_stl(ascii).unwrap().triangles.len(), 0);

        // Binary file whose header happens to start with "solid"
        let mut binary = binary_fixture(&[[
            0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0,
        ]]);
        binary[0..5].copy_from_slice(b"solid");
        assert_eq!(parse_stl(&binary).unwrap().triangles.len(), 1);
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(parse_stl(b"not an stl file at all").is_err());
    }
}
