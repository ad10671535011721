use num::Float;

/// `n` evenly spaced points from `min` to `max`, both included.
pub(crate) struct Linspace<F> {
    start: F,
    step: F,
    index: usize,
    len: usize,
}

impl<F: Float> Linspace<F> {
    pub(crate) fn new(min: F, max: F, n: usize) -> Self {
        let step = match F::from(n.saturating_sub(1)) {
            Some(num_steps) if n > 1 => (max - min) / num_steps,
            _ => F::zero(),
        };

        Linspace {
            start: min,
            step,
            index: 0,
            len: n,
        }
    }

    /// The `resolution + 1` sample points of a defuzzification scan.
    pub(crate) fn samples(min: F, max: F, resolution: usize) -> Self {
        Self::new(min, max, resolution.saturating_add(1))
    }
}

impl<F: Float> Iterator for Linspace<F> {
    type Item = F;

    #[inline]
    fn next(&mut self) -> Option<F> {
        if self.index >= self.len {
            return None;
        }

        // min + i * step, not accumulated
        let i = F::from(self.index)?;
        self.index += 1;

        Some(self.start + self.step * i)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl<F: Float> ExactSizeIterator for Linspace<F> {}

#[test]
fn test_linspace() {
    let points: Vec<f64> = Linspace::new(0., 100., 5).collect();

    assert_eq!(points, vec![0., 25., 50., 75., 100.]);

    let points: Vec<f32> = Linspace::new(-1., 1., 3).collect();

    assert_eq!(points, vec![-1., 0., 1.]);
    assert_eq!(Linspace::new(3., 7., 1).collect::<Vec<f64>>(), vec![3.]);
    assert_eq!(Linspace::<f64>::new(3., 7., 0).count(), 0);
}

#[test]
fn test_samples_include_both_ends() {
    let points: Vec<f64> = Linspace::samples(0., 50., 1000).collect();

    assert_eq!(points.len(), 1001);
    assert_eq!(points[0], 0.);
    assert_eq!(points[1000], 50.);
    assert_eq!(points[500], 25.);

    let step = 50. / 1000.;

    for (i, x) in points.into_iter().enumerate() {
        assert_eq!(x, 0. + step * i as f64);
    }
}
