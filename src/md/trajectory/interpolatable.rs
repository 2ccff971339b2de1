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

use super::{TrajError, TrajInterpolationSnafu};
use crate::cosmic::Frame;
use crate::linalg::allocator::Allocator;
use crate::linalg::DefaultAllocator;
use crate::math::interpolation::hermite_eval;
use crate::time::Epoch;
use crate::{Orbit, Spacecraft, State, TimeTagged};
use snafu::ResultExt;

/// Number of states used to interpolate a trajectory window.
pub const INTERPOLATION_SAMPLES: usize = 13;

/// States that can be interpolated should implement this trait.
pub trait Interpolatable: State
where
    Self: Sized,
    DefaultAllocator: Allocator<Self::Size>
        + Allocator<Self::Size, Self::Size>
        + Allocator<Self::VecLength>,
{
    /// Interpolates a new state at the provided epoch given a slice of states.
    fn interpolate(self, epoch: Epoch, states: &[Self]) -> Result<Self, TrajError>;

    /// Returns the frame of this state
    fn frame(&self) -> Frame;

    /// Returns the orbit of this state
    fn orbit(&self) -> &Orbit;
}

impl Interpolatable for Orbit {
    fn interpolate(self, epoch: Epoch, states: &[Self]) -> Result<Self, TrajError> {
        // Statically allocated arrays of the maximum number of samples
        let mut epochs_tdb = [0.0; INTERPOLATION_SAMPLES + 1];
        let mut xs = [0.0; INTERPOLATION_SAMPLES + 1];
        let mut ys = [0.0; INTERPOLATION_SAMPLES + 1];
        let mut zs = [0.0; INTERPOLATION_SAMPLES + 1];
        let mut vxs = [0.0; INTERPOLATION_SAMPLES + 1];
        let mut vys = [0.0; INTERPOLATION_SAMPLES + 1];
        let mut vzs = [0.0; INTERPOLATION_SAMPLES + 1];

        for (cno, state) in states.iter().enumerate() {
            xs[cno] = state.x_km;
            ys[cno] = state.y_km;
            zs[cno] = state.z_km;
            vxs[cno] = state.vx_km_s;
            vys[cno] = state.vy_km_s;
            vzs[cno] = state.vz_km_s;
            epochs_tdb[cno] = state.epoch().to_tdb_seconds();
        }

        let eval_s = epoch.to_tdb_seconds();

        let (x_km, vx_km_s) = hermite_eval(
            &epochs_tdb[..states.len()],
            &xs[..states.len()],
            &vxs[..states.len()],
            eval_s,
        )
        .context(TrajInterpolationSnafu)?;

        let (y_km, vy_km_s) = hermite_eval(
            &epochs_tdb[..states.len()],
            &ys[..states.len()],
            &vys[..states.len()],
            eval_s,
        )
        .context(TrajInterpolationSnafu)?;

        let (z_km, vz_km_s) = hermite_eval(
            &epochs_tdb[..states.len()],
            &zs[..states.len()],
            &vzs[..states.len()],
            eval_s,
        )
        .context(TrajInterpolationSnafu)?;

        // And build the result
        let mut me = self;
        me.x_km = x_km;
        me.y_km = y_km;
        me.z_km = z_km;
        me.vx_km_s = vx_km_s;
        me.vy_km_s = vy_km_s;
        me.vz_km_s = vz_km_s;
        me.set_epoch(epoch);

        Ok(me)
    }

    fn frame(&self) -> Frame {
        self.frame
    }

    fn orbit(&self) -> &Orbit {
        self
    }
}

impl Interpolatable for Spacecraft {
    fn interpolate(self, epoch: Epoch, states: &[Self]) -> Result<Self, TrajError> {
        // Use the Orbit interpolation first.
        let orbit = Orbit::interpolate(
            self.orbit,
            epoch,
            &states.iter().map(|sc| sc.orbit).collect::<Vec<_>>(),
        )?;

        // Fuel is linearly interpolated
        let first = states.first().ok_or(TrajError::CreationError {
            msg: "no interpolation states".to_string(),
        })?;
        let last = states.last().unwrap();
        let span_s = last.epoch().to_tdb_seconds() - first.epoch().to_tdb_seconds();
        let fuel_kg_dt = if span_s.abs() < f64::EPSILON {
            0.0
        } else {
            (last.fuel_mass_kg - first.fuel_mass_kg) / span_s
        };

        let mut me = self.with_orbit(orbit);
        me.fuel_mass_kg = first.fuel_mass_kg
            + fuel_kg_dt * (epoch.to_tdb_seconds() - first.epoch().to_tdb_seconds());

        Ok(me)
    }

    fn frame(&self) -> Frame {
        self.orbit.frame
    }

    fn orbit(&self) -> &Orbit {
        &self.orbit
    }
}
