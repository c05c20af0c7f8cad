use crate::error::{Error, Result};

/// Number of cells in the `(b_len + 1) x (a_len + 1)` distance grid.
fn grid_cells(a_len: usize, b_len: usize) -> Result<usize> {
    let cols = a_len.checked_add(1);
    let rows = b_len.checked_add(1);
    match (rows, cols) {
        (Some(r), Some(c)) => r
            .checked_mul(c)
            .ok_or(Error::ResourceExhausted { cells: usize::MAX }),
        _ => Err(Error::ResourceExhausted { cells: usize::MAX }),
    }
}

/// Collect `s` into a buffer reserved up front, failing instead of aborting.
fn collect_chars(s: &str) -> Result<Vec<char>> {
    let len = s.chars().count();
    let mut chars = Vec::new();
    chars
        .try_reserve_exact(len)
        .map_err(|_| Error::ResourceExhausted { cells: len })?;
    chars.extend(s.chars());
    Ok(chars)
}

/// Classic Levenshtein distance over the full DP grid.
///
/// Characters are compared by scalar value only. The grid is a single
/// buffer reserved up front; if it or either character buffer cannot be
/// allocated the whole call fails with [`Error::ResourceExhausted`].
pub fn edit_distance(a: &str, b: &str) -> Result<usize> {
    let a = collect_chars(a)?;
    let b = collect_chars(b)?;
    let cols = a.len() + 1;
    let cells = grid_cells(a.len(), b.len())?;

    let mut grid: Vec<usize> = Vec::new();
    grid.try_reserve_exact(cells)
        .map_err(|_| Error::ResourceExhausted { cells })?;
    grid.resize(cells, 0);

    for (y, cell) in grid.iter_mut().take(cols).enumerate() {
        *cell = y;
    }

    for x in 1..=b.len() {
        let row = x * cols;
        let prev = row - cols;
        grid[row] = x;
        for y in 1..cols {
            let cost = usize::from(a[y - 1] != b[x - 1]);
            grid[row + y] = (grid[prev + y] + 1)
                .min(grid[row + y - 1] + 1)
                .min(grid[prev + y - 1] + cost);
        }
    }

    Ok(grid[cells - 1])
}
