/*
    Hemera, an orbit propagation engine
    Copyright (C) 2023-onwards Hemera Contributors

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use crate::linalg::allocator::Allocator;
use crate::linalg::{DefaultAllocator, DimName, OVector, Vector3};

// This determines when to take into consideration the magnitude of the state_delta and
// prevents dividing by too small of a number.
const REL_ERR_THRESH: f64 = 0.1;

/// The `ErrorCtrl` trait manages how a propagator computes the error in the current step.
pub trait ErrorCtrl: Copy + Send + Sync {
    /// Computes the actual error of the current step.
    ///
    /// The `error_est` is the estimated error computed from the difference in the two stages of
    /// the embedded Runge Kutta pair. The `candidate` variable is the candidate state, and
    /// `cur_state` is the current state. This function must return the error.
    fn estimate<N: DimName>(
        error_est: &OVector<f64, N>,
        candidate: &OVector<f64, N>,
        cur_state: &OVector<f64, N>,
    ) -> f64
    where
        DefaultAllocator: Allocator<N>;
}

/// An RSS step error control which effectively computes the L2 norm of the provided Vector of size 3
///
/// Note that this error controller should be preferably be used only with slices of a state with
/// the same units. For example, one should probably use this for position independently of using
/// it for the velocity.
/// (Source: GMAT ODEModel error computation)
fn rss_step(prop_err: &Vector3<f64>, candidate: &Vector3<f64>, cur_state: &Vector3<f64>) -> f64 {
    let mag = (candidate - cur_state).norm();
    let err = prop_err.norm();
    if mag > REL_ERR_THRESH {
        err / mag
    } else {
        err
    }
}

/// An RSS step error control over the entire state vector.
#[derive(Copy, Clone, Debug, Default)]
pub struct RSSStep;

impl ErrorCtrl for RSSStep {
    fn estimate<N: DimName>(
        error_est: &OVector<f64, N>,
        candidate: &OVector<f64, N>,
        cur_state: &OVector<f64, N>,
    ) -> f64
    where
        DefaultAllocator: Allocator<N>,
    {
        let mag = (candidate - cur_state).norm();
        let err = error_est.norm();
        if mag > REL_ERR_THRESH {
            err / mag
        } else {
            err
        }
    }
}

/// An RSS state error control which treats the radius and velocity of a Cartesian state
/// independently and returns the largest of both errors.
///
/// This is the recommended error controller for orbital states: when in doubt, use this one.
#[derive(Copy, Clone, Debug, Default)]
pub struct RSSCartesianStep;

impl ErrorCtrl for RSSCartesianStep {
    fn estimate<N: DimName>(
        error_est: &OVector<f64, N>,
        candidate: &OVector<f64, N>,
        cur_state: &OVector<f64, N>,
    ) -> f64
    where
        DefaultAllocator: Allocator<N>,
    {
        if N::dim() >= 6 {
            let err_radius = rss_step(
                &error_est.fixed_rows::<3>(0).into_owned(),
                &candidate.fixed_rows::<3>(0).into_owned(),
                &cur_state.fixed_rows::<3>(0).into_owned(),
            );
            let err_velocity = rss_step(
                &error_est.fixed_rows::<3>(3).into_owned(),
                &candidate.fixed_rows::<3>(3).into_owned(),
                &cur_state.fixed_rows::<3>(3).into_owned(),
            );
            err_radius.max(err_velocity)
        } else {
            RSSStep::estimate(error_est, candidate, cur_state)
        }
    }
}

/// A largest error control which effectively computes the largest error at each component
///
/// This is a standard error computation algorithm, but it's arguably bad if the state's components
/// have different units. It calculates the largest local estimate of the error from the integration
/// (`error_est`) given the difference in the candidate state and the previous state.
/// (Source: GMAT PhysicalModel error computation)
#[derive(Copy, Clone, Debug, Default)]
pub struct LargestError;

impl ErrorCtrl for LargestError {
    fn estimate<N: DimName>(
        error_est: &OVector<f64, N>,
        candidate: &OVector<f64, N>,
        cur_state: &OVector<f64, N>,
    ) -> f64
    where
        DefaultAllocator: Allocator<N>,
    {
        let state_delta = candidate - cur_state;
        let mut max_err = 0.0;
        for (i, prop_err_i) in error_est.iter().enumerate() {
            let err = if state_delta[i] > REL_ERR_THRESH {
                (prop_err_i / state_delta[i]).abs()
            } else {
                prop_err_i.abs()
            };
            if err > max_err {
                max_err = err;
            }
        }
        max_err
    }
}

#[cfg(test)]
mod ut_error_ctrl {
    use super::*;
    use crate::linalg::Vector6;

    #[test]
    fn rss_cartesian_splits_radius_and_velocity() {
        let cur = Vector6::new(7_000.0, 0.0, 0.0, 0.0, 7.5, 0.0);
        let candidate = Vector6::new(7_000.5, 0.0, 0.0, 0.0, 7.5001, 0.0);
        let err = Vector6::new(1e-9, 0.0, 0.0, 0.0, 1e-13, 0.0);
        let est = RSSCartesianStep::estimate(&err, &candidate, &cur);
        // The radius error dominates: 1e-9 / 0.5 = 2e-9 (the velocity barely moved, so its
        // error stays absolute at 1e-13)
        assert!((est - 2e-9).abs() < 1e-12);
    }

    #[test]
    fn rss_step_absolute_when_delta_small() {
        let cur = Vector3::new(0.0, 0.0, 0.0);
        let candidate = Vector3::new(1e-3, 0.0, 0.0);
        let err = Vector3::new(1e-9, 0.0, 0.0);
        // The state barely moved, so the error is absolute
        assert!((rss_step(&err, &candidate, &cur) - 1e-9).abs() < 1e-15);
    }
}
