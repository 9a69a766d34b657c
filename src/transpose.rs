use crate::error::{RbResult, RunebreakError};
use crate::scorer::ScoreModel;
use crate::stream::CipherStream;
use serde::Serialize;

/// Row-major grid of `ceil(n/width)` rows, read column-major. Absent cells
/// of a ragged final row are skipped. Pure reordering, length-preserving.
pub fn read_columnar(stream: &CipherStream, width: usize) -> RbResult<CipherStream> {
    if width == 0 {
        return Err(RunebreakError::Config(
            "Columnar width must be >= 1".to_string(),
        ));
    }
    let indices = stream.indices();
    let n = indices.len();
    let rows = n.div_ceil(width);

    let mut out = Vec::with_capacity(n);
    for col in 0..width {
        for row in 0..rows {
            let i = row * width + col;
            if i < n {
                out.push(indices[i]);
            }
        }
    }
    Ok(CipherStream::new(out, stream.marks().to_vec()))
}

/// The complementary reordering: fill the grid column-major, read
/// row-major. Exact inverse of `read_columnar` for the same width,
/// including ragged final rows.
pub fn write_columnar(stream: &CipherStream, width: usize) -> RbResult<CipherStream> {
    if width == 0 {
        return Err(RunebreakError::Config(
            "Columnar width must be >= 1".to_string(),
        ));
    }
    let indices = stream.indices();
    let n = indices.len();
    let rows = n.div_ceil(width);
    // Columns at or past the ragged cutoff are one cell short.
    let full_cols = if n % width == 0 { width } else { n % width };

    let mut out = vec![0u8; n];
    let mut src = 0;
    for col in 0..width {
        let height = if col < full_cols { rows } else { rows - 1 };
        for row in 0..height {
            out[row * width + col] = indices[src];
            src += 1;
        }
    }
    Ok(CipherStream::new(out, stream.marks().to_vec()))
}

/// Zig-zag across `rails` rows, rows read back concatenated.
pub fn read_rail_fence(stream: &CipherStream, rails: usize) -> RbResult<CipherStream> {
    if rails == 0 {
        return Err(RunebreakError::Config(
            "Rail count must be >= 1".to_string(),
        ));
    }
    let indices = stream.indices();
    if rails == 1 || indices.len() <= rails {
        return Ok(stream.clone());
    }

    let mut rows: Vec<Vec<u8>> = vec![Vec::new(); rails];
    let mut rail = 0usize;
    let mut down = true;
    for &sym in indices {
        rows[rail].push(sym);
        if down {
            if rail + 1 == rails {
                down = false;
                rail -= 1;
            } else {
                rail += 1;
            }
        } else if rail == 0 {
            down = true;
            rail += 1;
        } else {
            rail -= 1;
        }
    }

    let out: Vec<u8> = rows.into_iter().flatten().collect();
    Ok(CipherStream::new(out, stream.marks().to_vec()))
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    pub description: String,
    pub score: f32,
}

/// Re-scores grid re-orderings of the stream with the shared score model,
/// to detect a transposition layered over the substitution. No decryption
/// happens here; when nothing improves, the baseline row simply stays on
/// top.
pub fn probe(
    stream: &CipherStream,
    model: &ScoreModel,
    widths: &[usize],
    rails: &[usize],
) -> RbResult<Vec<ProbeResult>> {
    let mut results = vec![ProbeResult {
        description: "identity".to_string(),
        score: model.score(stream.indices()),
    }];

    for &width in widths {
        let reordered = read_columnar(stream, width)?;
        results.push(ProbeResult {
            description: format!("columnar width {}", width),
            score: model.score(reordered.indices()),
        });
    }
    for &rail in rails {
        let reordered = read_rail_fence(stream, rail)?;
        results.push(ProbeResult {
            description: format!("rail fence {}", rail),
            score: model.score(reordered.indices()),
        });
    }

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(results)
}
