//! Piecewise-linear function tables.

/// Interpolates `table`, a flat list of `x0, y0, x1, y1, ...` breakpoints with
/// increasing `x`. Returns `None` outside the tabulated range.
pub fn funct(x: f64, table: &[f64]) -> Option<f64> {
    table.chunks_exact(2).zip(table.chunks_exact(2).skip(1)).find_map(|(a, b)| {
        let (x1, y1, x2, y2) = (a[0], a[1], b[0], b[1]);
        (x >= x1 && x <= x2).then(|| y1 + (x - x1) * (y2 - y1) / (x2 - x1))
    })
}

/// Like [`funct`], but keeps `previous` when `x` is out of range.
pub fn lookup(x: f64, table: &[f64], previous: f64) -> f64 {
    funct(x, table).unwrap_or(previous)
}
