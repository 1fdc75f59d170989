use crate::catalog::PinId;
use crate::func::{FlipFlopUnit, IcBehavior, IcState, PinValues, Step};
use crate::logic::LogicState;

/// The clock transition that triggers a sequential element.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sensitivity {
    /// Triggered on a rising edge (low to high clock transition).
    Posedge,
    /// Triggered on a falling edge (high to low clock transition).
    Negedge,
}
impl Sensitivity {
    /// Checks whether the clock moving from `old` to `new` is a trigger.
    ///
    /// Only clean `0`/`1` transitions count as edges.
    ///
    /// ```
    /// use dld_trainer_engine::func::Sensitivity;
    /// use dld_trainer_engine::logic::LogicState;
    ///
    /// let (lo, hi) = (LogicState::Low, LogicState::High);
    /// assert!(Sensitivity::Posedge.activated(lo, hi));
    /// assert!(Sensitivity::Negedge.activated(hi, lo));
    /// assert!(!Sensitivity::Posedge.activated(hi, hi));
    /// ```
    pub fn activated(self, old: LogicState, new: LogicState) -> bool {
        match self {
            Sensitivity::Posedge => old == LogicState::Low && new == LogicState::High,
            Sensitivity::Negedge => old == LogicState::High && new == LogicState::Low,
        }
    }
}

/// Common pins of one flip-flop unit.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
struct UnitPins {
    clock: PinId,
    preset: PinId,
    clear: PinId,
    q: PinId,
    q_bar: PinId,
}

/// Applies the asynchronous controls, then the clocked update if the clock edge fires.
///
/// Clear dominates preset, which dominates the clock. Undriven
/// preset/clear read as the inactive `1`; an undriven clock reads as `0`.
fn clocked(
    unit: FlipFlopUnit,
    pins: &UnitPins,
    inputs: &PinValues,
    edge: Sensitivity,
    next: impl FnOnce(LogicState) -> LogicState,
    outputs: &mut PinValues,
) -> FlipFlopUnit {
    let clock = inputs.get_or(pins.clock, LogicState::Low);
    let preset = inputs.get_or(pins.preset, LogicState::High);
    let clear = inputs.get_or(pins.clear, LogicState::High);

    let q = if clear == LogicState::Low {
        LogicState::Low
    } else if preset == LogicState::Low {
        LogicState::High
    } else if edge.activated(unit.prev_clock, clock) {
        next(unit.q)
    } else {
        unit.q
    };

    outputs.set(pins.q, q);
    outputs.set(pins.q_bar, !q);
    FlipFlopUnit { q, prev_clock: clock }
}

fn units(state: &IcState) -> [FlipFlopUnit; 2] {
    match state {
        IcState::FlipFlops(units) => *units,
        IcState::Stateless => Default::default(),
    }
}

/// The 7474 dual D flip-flop (rising-edge triggered).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct DualDFlipFlop;
impl DualDFlipFlop {
    const UNITS: [(UnitPins, PinId); 2] = [
        (UnitPins { clear: PinId(1), clock: PinId(3), preset: PinId(4), q: PinId(5), q_bar: PinId(6) }, PinId(2)),
        (UnitPins { clear: PinId(13), clock: PinId(11), preset: PinId(10), q: PinId(9), q_bar: PinId(8) }, PinId(12)),
    ];
}
impl IcBehavior for DualDFlipFlop {
    fn initial_state(&self) -> IcState {
        IcState::FlipFlops(Default::default())
    }

    fn step(&self, state: &IcState, inputs: &PinValues) -> Step {
        let mut outputs = PinValues::new();
        let mut next = units(state);

        for (unit, (pins, d)) in next.iter_mut().zip(&Self::UNITS) {
            let d = inputs.get_or(*d, LogicState::Low);
            *unit = clocked(*unit, pins, inputs, Sensitivity::Posedge, |_| d, &mut outputs);
        }

        Step { state: IcState::FlipFlops(next), outputs }
    }
}

/// The 7476 dual JK flip-flop (falling-edge triggered).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct DualJkFlipFlop;
impl DualJkFlipFlop {
    const UNITS: [(UnitPins, PinId, PinId); 2] = [
        (UnitPins { clock: PinId(1), preset: PinId(2), clear: PinId(3), q: PinId(15), q_bar: PinId(14) }, PinId(4), PinId(16)),
        (UnitPins { clock: PinId(6), preset: PinId(7), clear: PinId(8), q: PinId(11), q_bar: PinId(10) }, PinId(9), PinId(12)),
    ];
}

/// The JK next-state table.
fn jk_next(j: LogicState, k: LogicState, q: LogicState) -> LogicState {
    use LogicState::{High, Low};
    match (j, k) {
        (Low, Low)   => q,
        (Low, High)  => Low,
        (High, Low)  => High,
        (High, High) => !q,
        _ => LogicState::Unk,
    }
}

impl IcBehavior for DualJkFlipFlop {
    fn initial_state(&self) -> IcState {
        IcState::FlipFlops(Default::default())
    }

    fn step(&self, state: &IcState, inputs: &PinValues) -> Step {
        let mut outputs = PinValues::new();
        let mut next = units(state);

        for (unit, (pins, j, k)) in next.iter_mut().zip(&Self::UNITS) {
            let j = inputs.get_or(*j, LogicState::Low);
            let k = inputs.get_or(*k, LogicState::Low);
            *unit = clocked(*unit, pins, inputs, Sensitivity::Negedge, |q| jk_next(j, k, q), &mut outputs);
        }

        Step { state: IcState::FlipFlops(next), outputs }
    }
}
