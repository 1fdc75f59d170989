//! The circuit model: placed ICs, wires, switches, LEDs and the power rail.
//!
//! A [`Circuit`] is the snapshot the simulator consumes. It is mutated in
//! place by the editing operations below; callers are expected to run
//! [`Circuit::simulate`] after every structural change.

pub mod graph;

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::catalog::{IcDefinition, IcType, PinId};
use crate::func::{Behavior, IcBehavior, IcState, PinValues};
use crate::logic::LogicState;
use crate::sim::{SimConfig, SimulationResult};

new_key_type! {
    /// Key type for placed ICs.
    pub struct IcKey;
    /// Key type for wires.
    pub struct WireKey;
    /// Key type for switches.
    pub struct SwitchKey;
    /// Key type for LEDs.
    pub struct LedKey;
}

/// Number of switches and LEDs on a fresh trainer board.
pub const BOARD_IO_COUNT: usize = 16;
/// Colour given to wires when none is specified.
pub const DEFAULT_WIRE_COLOR: &str = "#3b82f6";

/// Position on the board.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[allow(missing_docs)]
    pub x: f32,
    #[allow(missing_docs)]
    pub y: f32,
}
impl Position {
    /// Creates a position.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An IC placed on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedIc {
    /// The IC's type.
    pub ic_type: IcType,
    /// Where it sits on the board.
    pub position: Position,
    /// Rotation in degrees.
    pub rotation: u16,
    /// Sequential memory, only updated by simulation.
    pub(crate) state: IcState,
    /// Output pin values from the last committed powered simulation.
    /// These seed the next simulation.
    pub(crate) pin_states: PinValues,
}
impl PlacedIc {
    /// Creates a freshly placed IC with its behavior's initial state.
    pub fn new(ic_type: IcType, position: Position) -> Self {
        Self {
            ic_type,
            position,
            rotation: 0,
            state: Behavior::of(ic_type).initial_state(),
            pin_states: PinValues::new(),
        }
    }

    /// The catalog entry for this IC.
    pub fn definition(&self) -> &'static IcDefinition {
        self.ic_type.definition()
    }
    /// The behavior used to evaluate this IC.
    pub fn behavior(&self) -> Behavior {
        Behavior::of(self.ic_type)
    }
    /// The IC's memory.
    pub fn state(&self) -> &IcState {
        &self.state
    }
    /// Output pin values from the last committed simulation.
    pub fn pin_states(&self) -> &PinValues {
        &self.pin_states
    }
}

/// One end of a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Terminal {
    /// A pin of a placed IC.
    Pin {
        /// The IC.
        ic: IcKey,
        /// The pin on that IC.
        pin: PinId,
    },
    /// The output contact of a switch.
    Switch(SwitchKey),
    /// The input contact of an LED.
    Led(LedKey),
}
impl Terminal {
    /// Creates a terminal on an IC pin.
    pub fn pin(ic: IcKey, pin: u8) -> Self {
        Terminal::Pin { ic, pin: PinId(pin) }
    }
}
impl From<SwitchKey> for Terminal {
    fn from(value: SwitchKey) -> Self {
        Terminal::Switch(value)
    }
}
impl From<LedKey> for Terminal {
    fn from(value: LedKey) -> Self {
        Terminal::Led(value)
    }
}

/// A jumper wire.
///
/// The `from`/`to` order only matters for display; electrically a wire is undirected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wire {
    #[allow(missing_docs)]
    pub from: Terminal,
    #[allow(missing_docs)]
    pub to: Terminal,
    /// Display colour.
    pub color: String,
}
impl Wire {
    /// Whether either end of this wire touches the IC.
    pub fn touches_ic(&self, key: IcKey) -> bool {
        [self.from, self.to].iter().any(|t| matches!(t, Terminal::Pin { ic, .. } if *ic == key))
    }
}

/// A manual binary input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Switch {
    /// Label shown on the board.
    pub label: String,
    /// Whether the switch is up (`1`).
    pub on: bool,
}
impl Switch {
    /// The level this switch drives.
    pub fn level(&self) -> LogicState {
        LogicState::from(self.on)
    }
}

/// LED colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum LedColor {
    Red, Green, Yellow,
}

/// An observable output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Led {
    /// Label shown on the board.
    pub label: String,
    /// Display colour.
    pub color: LedColor,
    /// Only set by simulation.
    pub(crate) lit: bool,
}
impl Led {
    /// Whether the LED was lit by the last committed simulation.
    pub fn lit(&self) -> bool {
        self.lit
    }
}

/// A circuit on the trainer board.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Circuit {
    /// Identifier assigned by whoever persists the circuit.
    pub id: String,
    /// Circuit name.
    pub name: String,
    pub(crate) ics: SlotMap<IcKey, PlacedIc>,
    pub(crate) wires: SlotMap<WireKey, Wire>,
    pub(crate) switches: SlotMap<SwitchKey, Switch>,
    pub(crate) leds: SlotMap<LedKey, Led>,
    pub(crate) power_on: bool,
}

impl Circuit {
    /// Creates a fresh trainer board: 16 switches (`SW0`..`SW15`, all off),
    /// 16 LEDs (`L0`..`L15`, the first 8 green and the rest red), power off.
    pub fn new(name: &str) -> Self {
        let mut circuit = Self::empty(name);
        for i in 0..BOARD_IO_COUNT {
            circuit.add_switch(&format!("SW{i}"));
        }
        for i in 0..BOARD_IO_COUNT {
            let color = if i < BOARD_IO_COUNT / 2 { LedColor::Green } else { LedColor::Red };
            circuit.add_led(&format!("L{i}"), color);
        }
        circuit
    }

    /// Creates a circuit with no switches, LEDs or ICs.
    pub fn empty(name: &str) -> Self {
        Self { name: name.to_string(), ..Default::default() }
    }

    /// Sets the persistence identifier.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Places an IC on the board.
    pub fn add_ic(&mut self, ic_type: IcType, position: Position) -> IcKey {
        self.ics.insert(PlacedIc::new(ic_type, position))
    }
    /// Removes an IC and every wire attached to it.
    pub fn remove_ic(&mut self, key: IcKey) -> Option<PlacedIc> {
        let ic = self.ics.remove(key)?;
        self.wires.retain(|_, w| !w.touches_ic(key));
        Some(ic)
    }
    /// Moves an IC, returning whether it exists.
    pub fn move_ic(&mut self, key: IcKey, position: Position) -> bool {
        let Some(ic) = self.ics.get_mut(key) else { return false };
        ic.position = position;
        true
    }
    /// Rotates an IC by a quarter turn clockwise, returning whether it exists.
    pub fn rotate_ic(&mut self, key: IcKey) -> bool {
        let Some(ic) = self.ics.get_mut(key) else { return false };
        ic.rotation = (ic.rotation + 90) % 360;
        true
    }

    /// Adds a switch (initially off).
    pub fn add_switch(&mut self, label: &str) -> SwitchKey {
        self.switches.insert(Switch { label: label.to_string(), on: false })
    }
    /// Adds an LED (initially dark).
    pub fn add_led(&mut self, label: &str, color: LedColor) -> LedKey {
        self.leds.insert(Led { label: label.to_string(), color, lit: false })
    }

    /// Connects two terminals with a wire in the default colour.
    ///
    /// Terminals are not validated; a wire to something that
    /// does not exist is simply not a connection.
    pub fn add_wire(&mut self, from: impl Into<Terminal>, to: impl Into<Terminal>) -> WireKey {
        self.add_wire_colored(from, to, DEFAULT_WIRE_COLOR)
    }
    /// Connects two terminals with a wire of the given colour.
    pub fn add_wire_colored(&mut self, from: impl Into<Terminal>, to: impl Into<Terminal>, color: &str) -> WireKey {
        self.wires.insert(Wire { from: from.into(), to: to.into(), color: color.to_string() })
    }
    /// Removes a wire.
    pub fn remove_wire(&mut self, key: WireKey) -> Option<Wire> {
        self.wires.remove(key)
    }
    /// Removes every wire.
    pub fn clear_wires(&mut self) {
        self.wires.clear();
    }

    /// Sets a switch, returning whether it exists.
    pub fn set_switch(&mut self, key: SwitchKey, on: bool) -> bool {
        let Some(sw) = self.switches.get_mut(key) else { return false };
        sw.on = on;
        true
    }
    /// Flips a switch, returning its new position (if it exists).
    pub fn toggle_switch(&mut self, key: SwitchKey) -> Option<bool> {
        let sw = self.switches.get_mut(key)?;
        sw.on = !sw.on;
        Some(sw.on)
    }

    /// Turns the power rail on or off.
    pub fn set_power(&mut self, on: bool) {
        self.power_on = on;
    }
    /// Flips the power rail, returning the new state.
    pub fn toggle_power(&mut self) -> bool {
        self.power_on = !self.power_on;
        self.power_on
    }
    /// Whether the board is powered.
    pub fn power_on(&self) -> bool {
        self.power_on
    }

    /// Gets a placed IC.
    pub fn ic(&self, key: IcKey) -> Option<&PlacedIc> {
        self.ics.get(key)
    }
    /// Iterates over placed ICs.
    pub fn ics(&self) -> impl Iterator<Item = (IcKey, &PlacedIc)> {
        self.ics.iter()
    }
    /// Gets a wire.
    pub fn wire(&self, key: WireKey) -> Option<&Wire> {
        self.wires.get(key)
    }
    /// Iterates over wires.
    pub fn wires(&self) -> impl Iterator<Item = (WireKey, &Wire)> {
        self.wires.iter()
    }
    /// Gets a switch.
    pub fn switch(&self, key: SwitchKey) -> Option<&Switch> {
        self.switches.get(key)
    }
    /// Iterates over switches.
    pub fn switches(&self) -> impl Iterator<Item = (SwitchKey, &Switch)> {
        self.switches.iter()
    }
    /// Gets an LED.
    pub fn led(&self, key: LedKey) -> Option<&Led> {
        self.leds.get(key)
    }
    /// Iterates over LEDs.
    pub fn leds(&self) -> impl Iterator<Item = (LedKey, &Led)> {
        self.leds.iter()
    }

    /// Finds a switch by label.
    pub fn switch_by_label(&self, label: &str) -> Option<SwitchKey> {
        self.switches.iter().find(|(_, s)| s.label == label).map(|(k, _)| k)
    }
    /// Finds an LED by label.
    pub fn led_by_label(&self, label: &str) -> Option<LedKey> {
        self.leds.iter().find(|(_, l)| l.label == label).map(|(k, _)| k)
    }

    /// Simulates the circuit and commits the result:
    /// IC memory, IC pin values and LED states are written back.
    ///
    /// With the power off only the LEDs change; ICs keep the memory and
    /// pin values of the last powered simulation.
    pub fn simulate(&mut self, config: &SimConfig) -> SimulationResult {
        let sim = crate::sim::simulate(self, config);

        for (key, ic) in self.ics.iter_mut() {
            if let Some(&state) = sim.states.get(key) {
                ic.state = state;
            }
            if let Some(&pins) = sim.pins.get(key) {
                ic.pin_states = pins;
            }
        }
        for (key, led) in self.leds.iter_mut() {
            led.lit = sim.result.outputs.get(key).is_some_and(|s| s.is_high());
        }

        sim.result
    }
}
