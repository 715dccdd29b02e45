/// Destructible ground strip: one column per field unit along the baseline
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    columns: Vec<bool>,
    baseline: f64,
}

impl Terrain {
    pub fn new(width: usize, baseline: f64) -> Self {
        Self {
            columns: vec![true; width],
            baseline,
        }
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    pub fn columns(&self) -> &[bool] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Out-of-range columns count as already broken
    pub fn is_intact(&self, column: usize) -> bool {
        self.columns.get(column).copied().unwrap_or(false)
    }

    pub fn restore(&mut self) {
        self.columns.fill(true);
    }

    /// Breaks the column under `x` and its two neighbours.
    /// Returns false (and changes nothing) when that column is already gone.
    pub fn erode(&mut self, x: f64) -> bool {
        let column = x.floor();
        if !(column >= 0.0 && column < self.columns.len() as f64) {
            return false;
        }
        let column = column as usize;
        if !self.columns[column] {
            return false;
        }

        let first = column.saturating_sub(1);
        let last = (column + 1).min(self.columns.len() - 1);
        self.columns[first..=last].fill(false);
        true
    }
}
