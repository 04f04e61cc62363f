/// Evenly spaced samples over `[min, max]`, computed the way `numpy.linspace` does
/// so universes line up bit for bit with reference results.
pub(crate) struct Linspace {
    start: f64,
    stop: f64,
    step: f64,
    index: usize,
    len: usize,
}

impl Linspace {
    pub(crate) fn new(min: f64, max: f64, n: usize) -> Self {
        let step = if n > 1 {
            let num_steps = (n - 1) as f64;
            (max - min) / num_steps
        } else {
            0.
        };
        Linspace {
            start: min,
            stop: max,
            step,
            index: 0,
            len: n,
        }
    }
}

impl Iterator for Linspace {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        if self.index >= self.len {
            return None;
        }

        let i = self.index;
        self.index += 1;

        // numpy pins the endpoint instead of trusting the accumulated step
        if i + 1 == self.len && self.len > 1 {
            Some(self.stop)
        } else {
            Some(i as f64 * self.step + self.start)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Linspace {}

#[test]
fn test_linspace() {
    let values: Vec<_> = Linspace::new(0., 1., 11).collect();

    assert_eq!(values.len(), 11);
    assert_eq!(values[0], 0.);
    assert_eq!(values[5], 0.5);
    assert_eq!(values[10], 1.);

    let values: Vec<_> = Linspace::new(0.1, 1., 9).collect();

    assert_eq!(values[0], 0.1);
    assert_eq!(values[8], 1.);

    assert_eq!(Linspace::new(3., 7., 1).collect::<Vec<_>>(), vec![3.]);
    assert_eq!(Linspace::new(3., 7., 0).count(), 0);
}
