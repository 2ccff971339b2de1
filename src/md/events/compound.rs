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

use super::EventEvaluator;
use crate::errors::EventError;
use crate::linalg::allocator::Allocator;
use crate::linalg::DefaultAllocator;
use crate::time::Duration;
use crate::State;
use std::fmt;

/// A logical AND of two event conditions.
///
/// The evaluation is the maximum of both children evaluations: it is non-positive exactly when
/// both children are non-positive, so a sign change of the combined value matches the compound
/// condition becoming satisfied or unsatisfied.
#[derive(Copy, Clone, Debug)]
pub struct AndEvent<L, R> {
    pub left: L,
    pub right: R,
}

impl<L, R> AndEvent<L, R> {
    pub fn new(left: L, right: R) -> Self {
        Self { left, right }
    }
}

impl<L: fmt::Display, R: fmt::Display> fmt::Display for AndEvent<L, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} and {})", self.left, self.right)
    }
}

impl<S: State, L, R> EventEvaluator<S> for AndEvent<L, R>
where
    L: EventEvaluator<S>,
    R: EventEvaluator<S>,
    DefaultAllocator: Allocator<S::Size> + Allocator<S::Size, S::Size> + Allocator<S::VecLength>,
{
    fn eval(&self, state: &S) -> Result<f64, EventError> {
        Ok(self.left.eval(state)?.max(self.right.eval(state)?))
    }

    fn epoch_precision(&self) -> Duration {
        self.left
            .epoch_precision()
            .min(self.right.epoch_precision())
    }

    fn value_precision(&self) -> f64 {
        self.left
            .value_precision()
            .min(self.right.value_precision())
    }
}

/// A logical OR of two event conditions.
///
/// The evaluation is the minimum of both children evaluations: it is non-positive exactly when
/// either child is non-positive.
#[derive(Copy, Clone, Debug)]
pub struct OrEvent<L, R> {
    pub left: L,
    pub right: R,
}

impl<L, R> OrEvent<L, R> {
    pub fn new(left: L, right: R) -> Self {
        Self { left, right }
    }
}

impl<L: fmt::Display, R: fmt::Display> fmt::Display for OrEvent<L, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} or {})", self.left, self.right)
    }
}

impl<S: State, L, R> EventEvaluator<S> for OrEvent<L, R>
where
    L: EventEvaluator<S>,
    R: EventEvaluator<S>,
    DefaultAllocator: Allocator<S::Size> + Allocator<S::Size, S::Size> + Allocator<S::VecLength>,
{
    fn eval(&self, state: &S) -> Result<f64, EventError> {
        Ok(self.left.eval(state)?.min(self.right.eval(state)?))
    }

    fn epoch_precision(&self) -> Duration {
        self.left
            .epoch_precision()
            .min(self.right.epoch_precision())
    }

    fn value_precision(&self) -> f64 {
        self.left
            .value_precision()
            .min(self.right.value_precision())
    }
}
