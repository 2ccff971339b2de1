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

use crate::cosmic::AstroError;
use crate::dynamics::DynamicsError;
use crate::io::ConfigError;
use crate::md::trajectory::TrajError;
use crate::propagators::PropagationError;
use crate::time::Epoch;
use snafu::prelude::*;

/// Top level error enum, used when the specific kind of error does not matter to the caller.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum HemeraError {
    #[snafu(display("propagation failed: {source}"))]
    Propagation { source: PropagationError },
    #[snafu(display("dynamics error: {source}"))]
    Dynamics { source: DynamicsError },
    #[snafu(display("astro error: {source}"))]
    Astro { source: AstroError },
    #[snafu(display("trajectory error: {source}"))]
    Trajectory { source: TrajError },
    #[snafu(display("event error: {source}"))]
    Event { source: EventError },
    #[snafu(display("configuration error: {source}"))]
    Config { source: ConfigError },
    #[snafu(display("{msg}"))]
    CustomError { msg: String },
}

/// Errors when searching for, or evaluating, events.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EventError {
    #[snafu(display("event {event} not found between {start} and {end}"))]
    NotFound {
        start: Epoch,
        end: Epoch,
        event: String,
    },
    #[snafu(display("when searching for an event: {source}"))]
    EventTrajError { source: TrajError },
    #[snafu(display("event evaluation failed: {source}"))]
    EventAstroError { source: AstroError },
}
