//! Bounded-size decimation of plot rows.

/// Maximum number of points a chart is handed by default.
pub const DEFAULT_BUDGET: usize = 800;

/// Reduce `rows` to roughly `budget + 1` evenly spread points.
///
/// Inputs no longer than `budget` come back untouched, before any windowing.
/// When both indices are given the half-open window `[min_index, max_index)`
/// is taken first; out-of-range bounds clamp and an inverted window is empty.
/// The first and last rows of the (windowed) sequence are always kept, and
/// the last may repeat the previous pick.
pub fn limit<T: Clone>(
    rows: &[T],
    min_index: Option<usize>,
    max_index: Option<usize>,
    budget: usize,
) -> Vec<T> {
    if rows.len() <= budget {
        return rows.to_vec();
    }

    let window = match (min_index, max_index) {
        (Some(min), Some(max)) => {
            let end = max.min(rows.len());
            &rows[min.min(end)..end]
        }
        _ => rows,
    };
    if window.len() <= budget {
        return window.to_vec();
    }

    let n = window.len();
    let mut out = Vec::with_capacity(budget + 2);
    out.push(window[0].clone());
    for (i, row) in window.iter().enumerate() {
        // ceil(i * budget / n)
        let nth = (i * budget).div_ceil(n);
        if out.len() + 1 == nth {
            out.push(row.clone());
        }
    }
    out.push(window[n - 1].clone());

    tracing::debug!(input = n, output = out.len(), budget, "downsampled rows");
    out
}
