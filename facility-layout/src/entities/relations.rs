use ndarray::Array2;

/// Discrete relative-position relations between all department pairs.
///
/// `alpha[[i, j]]` asserts that department i lies entirely to the left of j,
/// `beta[[i, j]]` that i lies entirely below j. For every pair `(i, j)` with
/// `i != j` exactly one of `alpha[[i, j]]`, `alpha[[j, i]]`, `beta[[i, j]]`,
/// `beta[[j, i]]` holds; the diagonals are always false.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationMatrices {
    pub alpha: Array2<bool>,
    pub beta: Array2<bool>,
}

impl RelationMatrices {
    pub fn empty(n: usize) -> Self {
        Self {
            alpha: Array2::from_elem((n, n), false),
            beta: Array2::from_elem((n, n), false),
        }
    }

    /// Number of departments covered by the matrices.
    pub fn n(&self) -> usize {
        self.alpha.nrows()
    }

    /// Whether exactly one relation holds per off-diagonal pair and none on the diagonal.
    pub fn invariant_holds(&self) -> bool {
        let n = self.n();
        if self.alpha.dim() != (n, n) || self.beta.dim() != (n, n) {
            return false;
        }
        for i in 0..n {
            if self.alpha[[i, i]] || self.beta[[i, i]] {
                return false;
            }
            for j in (i + 1)..n {
                let asserted = [
                    self.alpha[[i, j]],
                    self.alpha[[j, i]],
                    self.beta[[i, j]],
                    self.beta[[j, i]],
                ];
                if asserted.iter().filter(|&&b| b).count() != 1 {
                    return false;
                }
            }
        }
        true
    }
}
