//! The circuit simulator.
//!
//! [`simulate`] evaluates a circuit snapshot without touching it and hands
//! back everything needed to commit the result ([`Simulation`]).
//! [`Circuit::simulate`] is the committing form.
//!
//! Signals propagate through a bounded number of passes over every placed IC.
//! On each pass, every input pin reads the first driver found on its net
//! (a switch, or the latest output of an IC), the IC is stepped, and its
//! outputs become visible to every IC evaluated after it. Before the first
//! pass, IC outputs are the ones committed by the previous simulation, so an
//! IC evaluated early still sees the settled level of a later IC's output.

use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::SecondaryMap;
use tracing::{debug, trace, warn};

use crate::catalog::{IcType, PinRole};
use crate::circuit::graph::Nets;
use crate::circuit::{Circuit, IcKey, LedKey, Terminal};
use crate::error::CircuitError;
use crate::func::{IcBehavior, IcState, PinValues};
use crate::logic::LogicState;

/// Number of passes run by the default [`Propagation::Fixed`] mode.
pub const DEFAULT_PASSES: usize = 5;
/// Default bound on truth-table inputs (`2^12` simulations).
pub const DEFAULT_MAX_TRUTH_TABLE_INPUTS: usize = 12;

/// How many propagation passes a simulation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Propagation {
    /// Always run exactly `passes` passes.
    Fixed {
        #[allow(missing_docs)]
        passes: usize,
    },
    /// Stop after the first pass that changes no output or IC state,
    /// giving up (with a [`Warning::DidNotSettle`]) after `max_passes`.
    Settle {
        #[allow(missing_docs)]
        max_passes: usize,
    },
}
impl Default for Propagation {
    fn default() -> Self {
        Propagation::Fixed { passes: DEFAULT_PASSES }
    }
}

/// Simulation settings.
///
/// Every field has a default, so a partial (or empty) JSON object is valid:
///
/// ```
/// use dld_trainer_engine::sim::{Propagation, SimConfig};
///
/// let config = SimConfig::from_json(r#"{ "propagation": { "mode": "settle", "max_passes": 32 } }"#).unwrap();
/// assert_eq!(config.propagation, Propagation::Settle { max_passes: 32 });
/// assert_eq!(config.max_truth_table_inputs, 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Pass budget.
    pub propagation: Propagation,
    /// Bound enforced by [`crate::truth_table::generate_checked`].
    pub max_truth_table_inputs: usize,
}
impl Default for SimConfig {
    fn default() -> Self {
        Self {
            propagation: Propagation::default(),
            max_truth_table_inputs: DEFAULT_MAX_TRUTH_TABLE_INPUTS,
        }
    }
}
impl SimConfig {
    /// Parses a configuration from JSON.
    pub fn from_json(s: &str) -> Result<Self, CircuitError> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Advisory diagnostics. None of these stop a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Warning {
    /// The board is unpowered, so nothing was evaluated.
    PowerOff,
    /// An IC input pin has nothing driving it and reads as its default level.
    FloatingInput {
        /// The IC's type.
        ic_type: IcType,
        /// The pin's datasheet name.
        pin_name: &'static str,
    },
    /// Outputs were still changing when the pass budget ran out.
    DidNotSettle {
        /// Passes run.
        passes: usize,
    },
}
impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::PowerOff => f.write_str("Power is OFF. Turn on power to simulate."),
            Warning::FloatingInput { ic_type, pin_name } => write!(f, "Floating input: {ic_type} {pin_name}"),
            Warning::DidNotSettle { passes } => write!(f, "Circuit did not settle after {passes} passes"),
        }
    }
}

/// Fatal simulation problems.
///
/// Nothing produces these yet: conflicting drivers are resolved as a
/// wired-OR and dangling wires are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum SimulationError {
    /// Two drivers on one net disagree.
    ShortCircuit,
    /// A wire joins terminals that cannot be connected.
    InvalidConnection,
}

/// What a simulation reports to its caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationResult {
    /// The level of every LED (empty when the power is off).
    pub outputs: SecondaryMap<LedKey, LogicState>,
    /// Always empty.
    pub errors: Vec<SimulationError>,
    /// Advisory warnings, in the order they were found.
    pub warnings: Vec<Warning>,
}
impl SimulationResult {
    /// The level of an LED, if it was simulated.
    pub fn output(&self, led: LedKey) -> Option<LogicState> {
        self.outputs.get(led).copied()
    }

    /// The warnings as user-facing strings.
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

/// A simulation's full outcome: the result plus what must be committed to the circuit.
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    /// The reported result.
    pub result: SimulationResult,
    /// Every IC's state after the last pass.
    pub states: SecondaryMap<IcKey, IcState>,
    /// Every IC's output pin values after the last pass.
    pub pins: SecondaryMap<IcKey, PinValues>,
    /// Passes actually run.
    pub passes: usize,
}

/// Finds the value driving a terminal: the first switch or known IC output on its net.
fn resolve(
    circuit: &Circuit,
    nets: &Nets,
    pins: &SecondaryMap<IcKey, PinValues>,
    t: Terminal,
) -> Option<LogicState> {
    nets.peers(t).find_map(|peer| match peer {
        Terminal::Switch(k) => circuit.switch(k).map(|s| s.level()),
        Terminal::Pin { ic, pin } => pins.get(ic)?.get(pin),
        Terminal::Led(_) => None,
    })
}

/// Whether anything on the net can drive it, computed or not.
fn has_driver(circuit: &Circuit, nets: &Nets, t: Terminal) -> bool {
    nets.peers(t).any(|peer| match peer {
        Terminal::Switch(k) => circuit.switch(k).is_some(),
        Terminal::Pin { ic, pin } => circuit.ic(ic)
            .and_then(|ic| ic.definition().pin(pin))
            .is_some_and(|p| p.role == PinRole::Output),
        Terminal::Led(_) => false,
    })
}

/// Simulates a circuit without modifying it.
pub fn simulate(circuit: &Circuit, config: &SimConfig) -> Simulation {
    if !circuit.power_on() {
        debug!("power off, skipping simulation");
        return Simulation {
            result: SimulationResult { warnings: vec![Warning::PowerOff], ..Default::default() },
            ..Default::default()
        };
    }

    let nets = Nets::build(circuit.wires().map(|(_, w)| w));
    let (budget, settle) = match config.propagation {
        Propagation::Fixed { passes } => (passes, false),
        Propagation::Settle { max_passes } => (max_passes, true),
    };
    debug!(ics = circuit.ics().count(), wires = circuit.wires().count(), nets = nets.len(), budget, "simulating");

    let mut states: SecondaryMap<IcKey, IcState> = circuit.ics()
        .map(|(k, ic)| (k, *ic.state()))
        .collect();
    // Pass 1 reads the outputs committed by the previous call
    let mut pins: SecondaryMap<IcKey, PinValues> = circuit.ics()
        .map(|(k, ic)| (k, *ic.pin_states()))
        .collect();

    let mut passes = 0;
    let mut settled = false;
    while passes < budget {
        let mut changed = false;
        for (key, ic) in circuit.ics() {
            // 1. Resolve inputs from the current view of the board
            let inputs: PinValues = ic.definition()
                .pins.iter()
                .filter(|p| p.role.is_driven_input())
                .filter_map(|p| Some((p.id, resolve(circuit, &nets, &pins, Terminal::Pin { ic: key, pin: p.id })?)))
                .collect();

            // 2. Step, and publish outputs to later ICs
            let old_state = states.get(key).copied().unwrap_or_default();
            let step = ic.behavior().step(&old_state, &inputs);

            changed |= step.state != old_state || pins.get(key) != Some(&step.outputs);
            states.insert(key, step.state);
            pins.insert(key, step.outputs);
        }
        passes += 1;
        trace!(pass = passes, changed, "propagation pass");

        if settle && !changed {
            settled = true;
            break;
        }
    }

    let mut warnings = vec![];
    if settle && !settled {
        warn!(passes, "circuit did not settle");
        warnings.push(Warning::DidNotSettle { passes });
    }

    // LEDs are a wired-OR of the IC outputs on their net
    let outputs = circuit.leds()
        .map(|(key, _)| {
            let lit = nets.peers(Terminal::Led(key)).any(|peer| match peer {
                Terminal::Pin { ic, pin } => pins.get(ic).and_then(|v| v.get(pin)) == Some(LogicState::High),
                _ => false,
            });
            (key, LogicState::from(lit))
        })
        .collect();

    for (key, ic) in circuit.ics() {
        let floating = ic.definition()
            .pins_with_role(PinRole::Input)
            .filter(|p| {
                let t = Terminal::Pin { ic: key, pin: p.id };
                !nets.is_wired(t) || !has_driver(circuit, &nets, t)
            });
        for p in floating {
            warnings.push(Warning::FloatingInput { ic_type: ic.ic_type, pin_name: p.name });
        }
    }

    debug!(passes, warnings = warnings.len(), "simulation finished");
    Simulation {
        result: SimulationResult { outputs, errors: vec![], warnings },
        states,
        pins,
        passes,
    }
}
