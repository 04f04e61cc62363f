use num::Float;

/// Similar to numpy.interp
///
/// `coords` must be sorted by x. Inputs left of the first point take its degree,
/// inputs right of the last point take the last degree.
pub(crate) fn interp<F: Float>(x_input: impl IntoIterator<Item = F>, coords: &[(F, F)]) -> Vec<F> {
    x_input
        .into_iter()
        .map(|x| {
            let (Some(&(first_x, first_y)), Some(&(last_x, last_y))) = (coords.first(), coords.last()) else {
                return F::zero();
            };

            if x < first_x {
                return first_y;
            }
            if x >= last_x {
                return last_y;
            }

            // Last point at or left of x; never the final point given the guard above
            let j = coords.partition_point(|&(xp, _)| xp <= x) - 1;
            let (x1, y1) = coords[j];
            let (x2, y2) = coords[j + 1];

            if x == x1 {
                return y1;
            }

            let slope = (y2 - y1) / (x2 - x1);

            slope * (x - x1) + y1
        })
        .collect()
}

/// Row-major dense matrix
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Matrix<F> {
    data: Vec<F>,
    shape: (usize, usize),
}

impl<F: Float> Matrix<F> {
    pub(crate) fn new(data: Vec<F>, shape: (usize, usize)) -> Self {
        debug_assert_eq!(data.len(), shape.0 * shape.1);

        Self { data, shape }
    }

    pub(crate) fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub(crate) fn get(&self, row: usize, col: usize) -> F {
        self.data[row * self.shape.1 + col]
    }

    /// Similar to numpy.tile
    pub(crate) fn tile(&self, (row_reps, col_reps): (usize, usize)) -> Self {
        let (rows, cols) = self.shape;
        let shape = (rows * row_reps, cols * col_reps);
        let mut data = Vec::with_capacity(shape.0 * shape.1);

        for _ in 0..row_reps {
            for row in self.data.chunks(cols.max(1)) {
                for _ in 0..col_reps {
                    data.extend_from_slice(row);
                }
            }
        }

        Self::new(data, shape)
    }

    /// Maximum down each column, one value per column
    pub(crate) fn column_max(&self) -> Vec<F> {
        let (rows, cols) = self.shape;

        (0..cols)
            .map(|j| (0..rows).map(|i| self.get(i, j)).fold(F::neg_infinity(), F::max))
            .collect()
    }
}

impl<F> IntoIterator for Matrix<F> {
    type Item = F;
    type IntoIter = std::vec::IntoIter<F>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'m, F: Copy> IntoIterator for &'m Matrix<F> {
    type Item = F;
    type IntoIter = std::iter::Copied<std::slice::Iter<'m, F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter().copied()
    }
}

pub(crate) trait CollectMatrix<F> {
    fn collect_matrix(self, shape: (usize, usize)) -> Matrix<F>;
}

impl<F: Float, I: IntoIterator<Item = F>> CollectMatrix<F> for I {
    fn collect_matrix(self, shape: (usize, usize)) -> Matrix<F> {
        Matrix::new(self.into_iter().collect(), shape)
    }
}

/// Similar to numpy.meshgrid: both outputs have shape `(len(y), len(x))`, `x` varying
/// along columns and `y` along rows.
pub(crate) fn meshgrid<F: Float>(x: impl IntoIterator<Item = F>, y: impl IntoIterator<Item = F>) -> (Matrix<F>, Matrix<F>) {
    let x: Vec<F> = x.into_iter().collect();
    let y: Vec<F> = y.into_iter().collect();
    let shape = (y.len(), x.len());
    let mut xx = Vec::with_capacity(shape.0 * shape.1);
    let mut yy = Vec::with_capacity(shape.0 * shape.1);

    for &y_val in &y {
        xx.extend_from_slice(&x);
        yy.extend(std::iter::repeat(y_val).take(x.len()));
    }

    (Matrix::new(xx, shape), Matrix::new(yy, shape))
}

#[test]
fn test_interp() {
    let x = [0., 1., 1.5, 2.72, 3.24];
    let xs = [1., 2., 3.];
    let ys = [3., 2., 0.];
    let coords: Vec<_> = xs.into_iter().zip(ys).collect();

    assert_eq!(interp(x, &coords), vec![3., 3., 2.5, 0.5599999999999996, 0.]);

    let x = [2.5, -1., 7.5];
    let xs = [0., 1., 2., 3., 4.5];
    let ys = [0., 2., 5., 3., 2.];
    let coords: Vec<_> = xs.into_iter().zip(ys).collect();

    assert_eq!(interp(x, &coords), vec![4., 0., 2.]);
}

#[test]
fn test_interp_degenerate_coords() {
    assert_eq!(interp([1., 2.], &[]), vec![0., 0.]);
    assert_eq!(interp([-1., 5., 9.], &[(5., 0.4)]), vec![0.4, 0.4, 0.4]);
    // A vertical step takes the later degree, like numpy
    assert_eq!(interp([1., 2., 3.], &[(1., 0.), (2., 0.), (2., 1.), (3., 1.)]), vec![0., 1., 1.]);
}

#[test]
fn test_meshgrid_tile_and_max() {
    let (xx, yy) = meshgrid([1., 2., 3.], [10., 20.]);

    assert_eq!(xx.shape(), (2, 3));
    assert_eq!(xx.into_iter().collect::<Vec<_>>(), vec![1., 2., 3., 1., 2., 3.]);
    assert_eq!(yy.into_iter().collect::<Vec<_>>(), vec![10., 10., 10., 20., 20., 20.]);

    let column = Matrix::new(vec![0.2, 0.9], (2, 1));
    let tiled = column.tile((1, 3));

    assert_eq!(tiled.shape(), (2, 3));
    assert_eq!(tiled.get(1, 2), 0.9);

    let m = Matrix::new(vec![0.1, 0.7, 0.3, 0.4, 0.2, 0.8], (2, 3));

    assert_eq!(m.column_max(), vec![0.4, 0.7, 0.8]);
}
