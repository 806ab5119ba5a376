//! Decaying scalar sequences for learning and exploration rates.
//!
//! A [`Schedule`] maps a visit count or an iteration index to a scalar.
//! Every variant is fully determined at construction time; the target-at
//! variants solve for their decay constant once so that the sequence hits
//! `target_value` exactly at `target_iterations` and stays clamped there.
use crate::error::VeldError;
use serde::{Deserialize, Serialize};

/// The named input a schedule consumes at call time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayInput {
    /// The schedule ignores its input.
    Unused,
    /// Aggregate visit count of the current state.
    VisitCount,
    /// Iteration index of the learning loop.
    Iteration,
}

impl DecayInput {
    fn as_str(&self) -> &'static str {
        match self {
            DecayInput::Unused => "none",
            DecayInput::VisitCount => "visit_count",
            DecayInput::Iteration => "iteration",
        }
    }
}

/// Schedule identifiers of the configuration surface.
///
/// Each identifier binds a curve shape to the decay input it consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleKind {
    /// Fixed value, no input.
    #[serde(rename = "CONSTANT")]
    Constant,
    /// `initial / visit_count`.
    #[serde(rename = "INV_VISIT_COUNT")]
    InvVisitCount,
    /// `initial * (n0 + 1) / (n0 + visit_count)`.
    #[serde(rename = "INV_VISIT_COUNT_SCALED")]
    InvVisitCountScaled,
    /// `initial / iteration`.
    #[serde(rename = "INV_ROUNDS")]
    InvRounds,
    /// `initial * (n0 + 1) / (n0 + iteration)`.
    #[serde(rename = "INV_ROUNDS_SCALED")]
    InvRoundsScaled,
    /// Inverse-time curve reaching `target_value` at `target_iterations`.
    #[serde(rename = "INV_ROUNDS_TARGET_AT")]
    InvRoundsTargetAt,
    /// `initial * exp(-n0 * (iteration - 1))`.
    #[serde(rename = "EXPONENTIAL")]
    Exponential,
    /// Exponential curve reaching `target_value` at `target_iterations`.
    #[serde(rename = "EXPONENTIAL_TARGET_AT")]
    ExponentialTargetAt,
}

/// Parameters of a schedule; which of them are required depends on the
/// requested [`ScheduleKind`].
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct ScheduleParams {
    /// Value of the sequence at its first step.
    pub initial_value: Option<f64>,
    /// Value the target-at variants clamp to.
    pub target_value: Option<f64>,
    /// Step at which the target-at variants reach `target_value`.
    pub target_iterations: Option<u64>,
    /// Value of the constant variant.
    pub constant_value: Option<f64>,
    /// Offset of the scaled variants, or the decay rate of `EXPONENTIAL`.
    pub n0: Option<f64>,
}

#[derive(Clone, Debug)]
enum Curve {
    Constant {
        value: f64,
    },
    InverseTime {
        initial: f64,
    },
    InverseTimeScaled {
        initial: f64,
        n0: f64,
    },
    InverseTimeTargetAt {
        initial: f64,
        target: f64,
        target_iterations: u64,
        n0: f64,
    },
    Exponential {
        initial: f64,
        rate: f64,
    },
    ExponentialTargetAt {
        initial: f64,
        target: f64,
        target_iterations: u64,
        rate: f64,
    },
}

impl Curve {
    fn name(&self) -> &'static str {
        match self {
            Curve::Constant { .. } => "Constant",
            Curve::InverseTime { .. } => "InverseTime",
            Curve::InverseTimeScaled { .. } => "InverseTimeScaled",
            Curve::InverseTimeTargetAt { .. } => "InverseTimeTargetAt",
            Curve::Exponential { .. } => "Exponential",
            Curve::ExponentialTargetAt { .. } => "ExponentialTargetAt",
        }
    }
}

/// A decaying (or constant) scalar sequence.
#[derive(Clone, Debug)]
pub struct Schedule {
    curve: Curve,
    input: DecayInput,
}

fn require(
    value: Option<f64>,
    kind: &'static str,
    missing: &'static str,
) -> Result<f64, VeldError> {
    value.ok_or(VeldError::ScheduleConfig { kind, missing })
}

fn require_iterations(
    value: Option<u64>,
    kind: &'static str,
    missing: &'static str,
) -> Result<u64, VeldError> {
    value.ok_or(VeldError::ScheduleConfig { kind, missing })
}

impl Schedule {
    /// A constant schedule, mostly useful in tests and defaults.
    pub fn constant(value: f64) -> Self {
        Self {
            curve: Curve::Constant { value },
            input: DecayInput::Unused,
        }
    }

    /// Builds the schedule for a configuration identifier.
    ///
    /// Fails when a parameter required by the identifier is absent.
    pub fn build(kind: ScheduleKind, params: &ScheduleParams) -> Result<Self, VeldError> {
        let schedule = match kind {
            ScheduleKind::Constant => Self {
                curve: Curve::Constant {
                    value: require(params.constant_value, "Constant", "constant_value")?,
                },
                input: DecayInput::Unused,
            },
            ScheduleKind::InvVisitCount | ScheduleKind::InvRounds => Self {
                curve: Curve::InverseTime {
                    initial: require(params.initial_value, "InverseTime", "initial_value")?,
                },
                input: match kind {
                    ScheduleKind::InvVisitCount => DecayInput::VisitCount,
                    _ => DecayInput::Iteration,
                },
            },
            ScheduleKind::InvVisitCountScaled | ScheduleKind::InvRoundsScaled => Self {
                curve: Curve::InverseTimeScaled {
                    initial: require(params.initial_value, "InverseTimeScaled", "initial_value")?,
                    n0: require(params.n0, "InverseTimeScaled", "n0")?,
                },
                input: match kind {
                    ScheduleKind::InvVisitCountScaled => DecayInput::VisitCount,
                    _ => DecayInput::Iteration,
                },
            },
            ScheduleKind::InvRoundsTargetAt => {
                let kind = "InverseTimeTargetAt";
                let initial = require(params.initial_value, kind, "initial_value")?;
                let target = require(params.target_value, kind, "target_value")?;
                let target_iterations =
                    require_iterations(params.target_iterations, kind, "target_iterations")?;
                // Solve initial*(n0+1)/(n0+t) = target for t = target_iterations.
                let n0 = (initial - target_iterations as f64 * target) / (target - initial);
                Self {
                    curve: Curve::InverseTimeTargetAt {
                        initial,
                        target,
                        target_iterations,
                        n0,
                    },
                    input: DecayInput::Iteration,
                }
            }
            ScheduleKind::Exponential => Self {
                curve: Curve::Exponential {
                    initial: require(params.initial_value, "Exponential", "initial_value")?,
                    rate: require(params.n0, "Exponential", "n0")?,
                },
                input: DecayInput::Iteration,
            },
            ScheduleKind::ExponentialTargetAt => {
                let kind = "ExponentialTargetAt";
                let initial = require(params.initial_value, kind, "initial_value")?;
                let target = require(params.target_value, kind, "target_value")?;
                let target_iterations =
                    require_iterations(params.target_iterations, kind, "target_iterations")?;
                // Solve initial*exp(-rate*(t-1)) = target for t = target_iterations.
                let rate = (initial / target).ln() / (target_iterations as f64 - 1.0);
                Self {
                    curve: Curve::ExponentialTargetAt {
                        initial,
                        target,
                        target_iterations,
                        rate,
                    },
                    input: DecayInput::Iteration,
                }
            }
        };
        Ok(schedule)
    }

    /// The input this schedule consumes at call time.
    pub fn input(&self) -> DecayInput {
        self.input
    }

    /// Evaluates the schedule.
    ///
    /// Fails when the declared decay input is not supplied.
    pub fn value(
        &self,
        visit_count: Option<u64>,
        iteration: Option<u64>,
    ) -> Result<f64, VeldError> {
        let t = match self.input {
            DecayInput::Unused => 0,
            DecayInput::VisitCount => {
                visit_count.ok_or(VeldError::MissingScheduleInput {
                    kind: self.curve.name(),
                    input: self.input.as_str(),
                })?
            }
            DecayInput::Iteration => iteration.ok_or(VeldError::MissingScheduleInput {
                kind: self.curve.name(),
                input: self.input.as_str(),
            })?,
        };

        let value = match &self.curve {
            Curve::Constant { value } => *value,
            Curve::InverseTime { initial } => {
                if t == 0 {
                    *initial
                } else {
                    initial / t as f64
                }
            }
            Curve::InverseTimeScaled { initial, n0 } => {
                if *n0 == 0.0 && t == 0 {
                    *initial
                } else {
                    initial * (n0 + 1.0) / (n0 + t as f64)
                }
            }
            Curve::InverseTimeTargetAt {
                initial,
                target,
                target_iterations,
                n0,
            } => {
                if t > *target_iterations {
                    *target
                } else {
                    initial * (n0 + 1.0) / (n0 + t as f64)
                }
            }
            Curve::Exponential { initial, rate } => initial * (-rate * (t as f64 - 1.0)).exp(),
            Curve::ExponentialTargetAt {
                initial,
                target,
                target_iterations,
                rate,
            } => {
                if t > *target_iterations {
                    *target
                } else {
                    initial * (-rate * (t as f64 - 1.0)).exp()
                }
            }
        };

        Ok(value)
    }
}
