//! Per-IC behavior.
//!
//! Every IC type maps to one [`Behavior`] variant, which evaluates the
//! package as a pure state transition: given the IC's current [`IcState`]
//! and the values driven onto its input pins, [`IcBehavior::step`] returns
//! the next state and the values of its output pins. The simulator threads
//! the returned state back into the placed IC.
//!
//! ## This module notably consists of:
//! - **[`IcBehavior`]**: The evaluation interface.
//! - **[`Behavior`]**: The closed set of behaviors, one per package family.
//! - **[`PinValues`]**: Pin-indexed storage for input and output values.
//! - **[`IcState`]**: The memory an IC carries between evaluations.
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use crate::catalog::{IcType, PinId, MAX_PINS};
use crate::logic::LogicState;

pub use gates::*;
pub use memory::*;
pub use misc::*;

mod gates;
mod memory;
mod misc;

/// Values on the pins of one package, indexed by pin number.
///
/// On the input side, an absent value means the pin is undriven;
/// each behavior decides what level an undriven pin reads as.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinValues([Option<LogicState>; MAX_PINS]);
impl PinValues {
    /// Creates an empty set of pin values.
    pub fn new() -> Self {
        Default::default()
    }

    /// Gets the value on a pin (if one was set).
    pub fn get(&self, pin: PinId) -> Option<LogicState> {
        self.0[pin.index()?]
    }
    /// Gets the value on a pin, reading `default` if the pin is undriven.
    pub fn get_or(&self, pin: PinId, default: LogicState) -> LogicState {
        self.get(pin).unwrap_or(default)
    }

    /// Sets the value on a pin. Pins outside the largest package are ignored.
    pub fn set(&mut self, pin: PinId, value: LogicState) {
        if let Some(i) = pin.index() {
            self.0[i] = Some(value);
        }
    }
    /// Sets the value on a pin, returning the updated values.
    pub fn with(mut self, pin: PinId, value: LogicState) -> Self {
        self.set(pin, value);
        self
    }

    /// Iterates over every pin with a value, in pin order.
    pub fn iter(&self) -> impl Iterator<Item = (PinId, LogicState)> + '_ {
        // MAX_PINS fits in a u8
        (1..).map(PinId)
            .zip(self.0.iter())
            .filter_map(|(pin, v)| Some((pin, (*v)?)))
    }

    /// Whether no pin has a value.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}
impl FromIterator<(PinId, LogicState)> for PinValues {
    fn from_iter<I: IntoIterator<Item = (PinId, LogicState)>>(iter: I) -> Self {
        iter.into_iter().fold(PinValues::new(), |vals, (pin, v)| vals.with(pin, v))
    }
}

/// Memory of one flip-flop unit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlipFlopUnit {
    /// Stored `Q`.
    pub q: LogicState,
    /// The clock level sampled on the previous evaluation (for edge detection).
    pub prev_clock: LogicState,
}

/// The memory an IC carries between evaluations.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IcState {
    /// Combinational (or unimplemented) ICs keep no memory.
    #[default]
    Stateless,
    /// Dual flip-flop packages keep one unit per flip-flop.
    FlipFlops([FlipFlopUnit; 2]),
}

/// The result of evaluating an IC once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// State to carry into the next evaluation.
    pub state: IcState,
    /// Values on every output pin.
    pub outputs: PinValues,
}

/// The interface defining how an IC package evaluates.
#[enum_dispatch]
pub trait IcBehavior {
    /// The state a freshly placed IC starts in.
    fn initial_state(&self) -> IcState {
        IcState::Stateless
    }

    /// Evaluates the package once.
    ///
    /// This does not mutate anything; the caller is responsible for
    /// keeping the returned state.
    #[must_use]
    fn step(&self, state: &IcState, inputs: &PinValues) -> Step;
}

/// All IC behaviors.
#[enum_dispatch(IcBehavior)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Behavior {
    // Combinational
    QuadGate, HexInverter,
    // Sequential
    DualDFlipFlop, DualJkFlipFlop,
    // Catalogued only
    Unimplemented,
}
impl Behavior {
    /// Gets the behavior of an IC type.
    pub fn of(ic_type: IcType) -> Self {
        match ic_type {
            IcType::Ic7400 => QuadGate::new(GateOp::Nand, QuadGate::STANDARD_WIRING).into(),
            IcType::Ic7402 => QuadGate::new(GateOp::Nor, QuadGate::NOR_WIRING).into(),
            IcType::Ic7404 => HexInverter.into(),
            IcType::Ic7408 => QuadGate::new(GateOp::And, QuadGate::STANDARD_WIRING).into(),
            IcType::Ic7432 => QuadGate::new(GateOp::Or, QuadGate::STANDARD_WIRING).into(),
            IcType::Ic7486 => QuadGate::new(GateOp::Xor, QuadGate::STANDARD_WIRING).into(),
            IcType::Ic7474 => DualDFlipFlop.into(),
            IcType::Ic7476 => DualJkFlipFlop.into(),
            IcType::Ic7490
            | IcType::Ic7493
            | IcType::Ic74138
            | IcType::Ic74151
            | IcType::Ic7447 => Unimplemented::new(ic_type).into(),
        }
    }

    /// Whether this IC's outputs are actually computed from its inputs.
    pub fn is_implemented(&self) -> bool {
        !matches!(self, Behavior::Unimplemented(_))
    }
}
