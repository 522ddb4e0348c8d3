//! Model B-with-theta parameters and their optimizer-space layouts.
//!
//! [`ModelParameters`] holds the class prior `gamma` (length `K`, on the
//! simplex) and the per-annotator accuracies `theta` (length `n`, in
//! `[0, 1]`). Two flat layouts are supported for the optimizer:
//!
//! - **Direct**: `[gamma[0..K-1], theta]`. The last class probability is
//!   implied by `1 - Σ gamma[0..K-1]`. Iterates may leave the domain; the
//!   likelihood returns its floor value there.
//! - **Unconstrained**: `[z[0..K-1], logit(theta)]` where
//!   `gamma = softmax([z, 0])` (last class as baseline). Every real vector
//!   maps into the domain.
//!
//! Both layouts have length `(K - 1) + n`.
use crate::{
    model_bt::{
        core::validation::{validate_gamma, validate_nclasses, validate_theta},
        errors::{ModelError, ModelResult},
    },
    optimization::numerical_stability::transformations::{
        baseline_softmax, baseline_softmax_inv, safe_logistic, safe_logit,
    },
};
use ndarray::{Array1, ArrayView1, Axis, concatenate, s};
use rand::{
    Rng,
    distributions::{Distribution, Uniform},
};
use rand_distr::Dirichlet;

/// Dirichlet concentration for random class priors.
pub const GAMMA_INIT_CONCENTRATION: f64 = 2.0;
/// Lower bound of the uniform draw for random accuracies.
pub const THETA_INIT_LOW: f64 = 0.6;
/// Upper bound of the uniform draw for random accuracies.
pub const THETA_INIT_HIGH: f64 = 0.95;

/// Class prior and annotator accuracies.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParameters {
    pub gamma: Array1<f64>,
    pub theta: Array1<f64>,
}

impl ModelParameters {
    /// Build validated parameters.
    ///
    /// # Errors
    /// - [`ModelError::InvalidNClasses`] for an empty `gamma`.
    /// - Any error from `validate_gamma` / `validate_theta`.
    pub fn new(gamma: Array1<f64>, theta: Array1<f64>) -> ModelResult<Self> {
        validate_nclasses(gamma.len())?;
        validate_gamma(gamma.view(), gamma.len())?;
        validate_theta(theta.view(), theta.len())?;
        Ok(Self { gamma, theta })
    }

    /// Draw `gamma ~ Dirichlet(2, …, 2)` and `theta_j ~ U[0.6, 0.95]`.
    ///
    /// A single class has the only prior `[1.0]`.
    pub fn random<R: Rng + ?Sized>(
        nclasses: usize, nannotators: usize, rng: &mut R,
    ) -> ModelResult<Self> {
        let gamma = random_gamma(nclasses, rng)?;
        let theta = random_theta(nannotators, rng);
        Ok(Self { gamma, theta })
    }

    pub fn nclasses(&self) -> usize {
        self.gamma.len()
    }

    pub fn nannotators(&self) -> usize {
        self.theta.len()
    }

    /// Direct layout `[gamma[0..K-1], theta]`.
    pub fn to_vector(&self) -> Array1<f64> {
        let k = self.nclasses();
        concatenate![Axis(0), self.gamma.slice(s![..k - 1]), self.theta.view()]
    }

    /// Inverse of [`to_vector`](Self::to_vector).
    ///
    /// Only the length is checked; the reconstructed values may lie outside
    /// the domain.
    ///
    /// # Errors
    /// - [`ModelError::InvalidNClasses`] if `nclasses == 0`.
    /// - [`ModelError::ParamVectorLengthMismatch`] if `vector` is too short to
    ///   hold a single accuracy.
    pub fn from_vector(vector: ArrayView1<f64>, nclasses: usize) -> ModelResult<Self> {
        check_vector_len(vector.len(), nclasses)?;
        let head = vector.slice(s![..nclasses - 1]);
        let mut gamma = Array1::<f64>::zeros(nclasses);
        gamma.slice_mut(s![..nclasses - 1]).assign(&head);
        gamma[nclasses - 1] = 1.0 - head.sum();
        let theta = vector.slice(s![nclasses - 1..]).to_owned();
        Ok(Self { gamma, theta })
    }

    /// Unconstrained layout `[log(gamma_k / gamma_{K-1}), logit(theta)]`.
    ///
    /// Boundary values are clamped before the logs, so the map is finite for
    /// every valid parameter set.
    pub fn to_unconstrained(&self) -> Array1<f64> {
        concatenate![
            Axis(0),
            baseline_softmax_inv(&self.gamma).view(),
            self.theta.mapv(safe_logit).view()
        ]
    }

    /// Inverse of [`to_unconstrained`](Self::to_unconstrained). Always lands
    /// inside the domain.
    ///
    /// # Errors
    /// Same length checks as [`from_vector`](Self::from_vector).
    pub fn from_unconstrained(vector: ArrayView1<f64>, nclasses: usize) -> ModelResult<Self> {
        check_vector_len(vector.len(), nclasses)?;
        let gamma = baseline_softmax(&vector.slice(s![..nclasses - 1]).to_owned());
        let theta = vector.slice(s![nclasses - 1..]).mapv(safe_logistic);
        Ok(Self { gamma, theta })
    }
}

/// Random class prior; `[1.0]` for a single class.
pub fn random_gamma<R: Rng + ?Sized>(nclasses: usize, rng: &mut R) -> ModelResult<Array1<f64>> {
    validate_nclasses(nclasses)?;
    if nclasses == 1 {
        return Ok(Array1::ones(1));
    }
    let dirichlet = Dirichlet::new_with_size(GAMMA_INIT_CONCENTRATION, nclasses)
        .map_err(|e| ModelError::InvalidDistribution(e.to_string()))?;
    let draw: Vec<f64> = dirichlet.sample(rng);
    Ok(Array1::from(draw))
}

/// Random accuracies, i.i.d. uniform on `[THETA_INIT_LOW, THETA_INIT_HIGH)`.
pub fn random_theta<R: Rng + ?Sized>(nannotators: usize, rng: &mut R) -> Array1<f64> {
    let uniform = Uniform::new(THETA_INIT_LOW, THETA_INIT_HIGH);
    Array1::from_shape_fn(nannotators, |_| uniform.sample(rng))
}

// ---- Helper Methods ----

/// A flat vector must hold `K - 1` prior entries and at least one accuracy.
fn check_vector_len(len: usize, nclasses: usize) -> ModelResult<()> {
    validate_nclasses(nclasses)?;
    if len < nclasses {
        return Err(ModelError::ParamVectorLengthMismatch { expected: nclasses, found: len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    // Purpose
    // -------
    // The direct layout round-trips valid parameters.
    //
    // Given
    // -----
    // - K = 3, gamma = [0.2, 0.5, 0.3], 8 accuracies.
    //
    // Expect
    // ------
    // - Vector length 2 + 8 = 10 with gamma's last entry dropped;
    //   `from_vector(to_vector(p)) == p` within 1e-12.
    fn direct_layout_round_trips() {
        // Arrange
        let params = ModelParameters::new(
            array![0.2, 0.5, 0.3],
            array![0.9, 0.8, 0.7, 0.6, 0.65, 0.75, 0.85, 0.95],
        )
        .expect("valid parameters");

        // Act
        let vector = params.to_vector();
        let back = ModelParameters::from_vector(vector.view(), 3).expect("valid length");

        // Assert
        assert_eq!(vector.len(), 10);
        assert_eq!(vector[0], 0.2);
        assert_eq!(vector[2], 0.9);
        for (a, b) in back.gamma.iter().zip(params.gamma.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
        assert_eq!(back.theta, params.theta);
    }

    #[test]
    // Purpose
    // -------
    // `from_vector` does not validate the domain; `from_unconstrained` always
    // lands inside it.
    //
    // Given
    // -----
    // - Direct vector with gamma[0] = 1.4 and theta[0] = 1.5.
    // - Unconstrained vector with extreme entries.
    //
    // Expect
    // ------
    // - Direct: gamma = [1.4, -0.4], theta[0] = 1.5 (no error).
    // - Unconstrained: gamma on the simplex, every theta in [0, 1].
    fn direct_is_unchecked_and_unconstrained_stays_in_domain() {
        let direct = ModelParameters::from_vector(array![1.4, 1.5, 0.7].view(), 2)
            .expect("length is valid");
        assert_abs_diff_eq!(direct.gamma[1], -0.4, epsilon = 1e-12);
        assert_eq!(direct.theta[0], 1.5);

        let mapped = ModelParameters::from_unconstrained(array![-50.0, 900.0, -900.0].view(), 2)
            .expect("length is valid");
        assert_abs_diff_eq!(mapped.gamma.sum(), 1.0, epsilon = 1e-12);
        assert!(mapped.theta.iter().all(|t| (0.0..=1.0).contains(t)));
    }

    #[test]
    // Purpose
    // -------
    // The unconstrained layout round-trips interior parameters.
    fn unconstrained_layout_round_trips() {
        let params =
            ModelParameters::new(array![0.1, 0.6, 0.3], array![0.9, 0.61, 0.99]).expect("valid");
        let back = ModelParameters::from_unconstrained(params.to_unconstrained().view(), 3)
            .expect("valid length");
        for (a, b) in back.gamma.iter().zip(params.gamma.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-10);
        }
        for (a, b) in back.theta.iter().zip(params.theta.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-10);
        }
    }

    #[test]
    // Purpose
    // -------
    // Random initialization respects its supports and the K = 1 edge case.
    //
    // Given
    // -----
    // - Seeded RNG; K = 4 and K = 1 with 8 annotators.
    //
    // Expect
    // ------
    // - gamma on the simplex; theta in [0.6, 0.95); K = 1 gives gamma = [1].
    fn random_initialization_respects_supports() {
        // Arrange
        let mut rng = StdRng::seed_from_u64(7);

        // Act
        let params = ModelParameters::random(4, 8, &mut rng).expect("valid draw");
        let single = ModelParameters::random(1, 8, &mut rng).expect("valid draw");

        // Assert
        assert_abs_diff_eq!(params.gamma.sum(), 1.0, epsilon = 1e-12);
        assert!(params.gamma.iter().all(|g| *g >= 0.0));
        assert!(params.theta.iter().all(|t| (THETA_INIT_LOW..THETA_INIT_HIGH).contains(t)));
        assert_eq!(single.gamma, array![1.0]);
        assert!(ModelParameters::new(single.gamma, single.theta).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Length errors surface as structured errors; `K - 1` prior entries
    // plus a single accuracy is the shortest accepted vector.
    fn short_vectors_are_rejected() {
        let minimal = ModelParameters::from_vector(array![0.4, 0.9].view(), 2)
            .expect("one prior entry and one accuracy");
        assert_eq!(minimal.nannotators(), 1);
        assert_abs_diff_eq!(minimal.gamma[1], 0.6, epsilon = 1e-12);
        assert_eq!(
            ModelParameters::from_unconstrained(array![0.0].view(), 1)
                .map(|p| p.nannotators()),
            Ok(1)
        );

        assert_eq!(
            ModelParameters::from_vector(array![0.5, 0.5].view(), 3),
            Err(ModelError::ParamVectorLengthMismatch { expected: 3, found: 2 })
        );
        assert!(matches!(
            ModelParameters::from_unconstrained(array![0.1].view(), 0),
            Err(ModelError::InvalidNClasses { .. })
        ));
    }
}
