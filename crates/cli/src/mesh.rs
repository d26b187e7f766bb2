//! Mesh loading: Wavefront OBJ (`v`/`f` records) or JSON `{ vertices, faces }`.

use anyhow::{anyhow, bail, Context, Result};
use nanoroute::Graph;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Polygon mesh as a vertex count and zero-based face loops.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: usize,
    pub faces: Vec<Vec<usize>>,
}

impl Mesh {
    pub fn to_graph(&self) -> Result<Graph> {
        Graph::from_faces(self.vertices, &self.faces).context("building graph from mesh faces")
    }
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let text =
        fs::read_to_string(path).with_context(|| format!("reading mesh {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("obj") => parse_obj(&text).with_context(|| format!("parsing {}", path.display())),
        Some("json") => serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display())),
        _ => bail!(
            "unsupported mesh format for {} (expected .obj or .json)",
            path.display()
        ),
    }
}

/// Parse the topology of an OBJ file. Face indices are one-based; negative
/// indices count back from the last vertex read so far. Texture and normal
/// references (`f 1/2/3 …`) are ignored.
pub fn parse_obj(text: &str) -> Result<Mesh> {
    let mut vertices = 0usize;
    let mut faces = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => vertices += 1,
            Some("f") => {
                let face = tokens
                    .map(|tok| resolve_index(tok, vertices))
                    .collect::<Result<Vec<_>>>()
                    .with_context(|| format!("line {}", lineno + 1))?;
                faces.push(face);
            }
            _ => {}
        }
    }
    Ok(Mesh { vertices, faces })
}

fn resolve_index(token: &str, seen: usize) -> Result<usize> {
    let head = token.split('/').next().unwrap_or(token);
    let raw: i64 = head
        .parse()
        .with_context(|| format!("bad face index {token:?}"))?;
    let idx = if raw > 0 {
        raw - 1
    } else if raw < 0 {
        seen as i64 + raw
    } else {
        return Err(anyhow!("face index 0 is not valid in OBJ"));
    };
    if idx < 0 {
        bail!("face index {raw} points before the first vertex");
    }
    Ok(idx as usize)
}
