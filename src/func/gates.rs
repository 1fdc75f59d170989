use crate::catalog::PinId;
use crate::func::{IcBehavior, IcState, PinValues, Step};
use crate::logic::LogicState;

/// The two-input function of one gate in a quad package.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[allow(missing_docs)]
pub enum GateOp {
    And, Or, Nand, Nor, Xor,
}
impl GateOp {
    /// Applies the function.
    pub fn apply(self, a: LogicState, b: LogicState) -> LogicState {
        match self {
            GateOp::And  => a & b,
            GateOp::Or   => a | b,
            GateOp::Nand => a.nand(b),
            GateOp::Nor  => a.nor(b),
            GateOp::Xor  => a ^ b,
        }
    }
}

/// Which pins feed, and are driven by, one gate of a package.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct GateWiring {
    /// First input.
    pub a: PinId,
    /// Second input.
    pub b: PinId,
    /// Output.
    pub y: PinId,
}
const fn wiring(a: u8, b: u8, y: u8) -> GateWiring {
    GateWiring { a: PinId(a), b: PinId(b), y: PinId(y) }
}

/// A quad 2-input gate package (7400, 7402, 7408, 7432, 7486).
///
/// Undriven inputs read as `0`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct QuadGate {
    op: GateOp,
    wiring: [GateWiring; 4],
}
impl QuadGate {
    /// Pinout of the 7400, 7408, 7432 and 7486.
    pub const STANDARD_WIRING: [GateWiring; 4] = [
        wiring(1, 2, 3),
        wiring(4, 5, 6),
        wiring(9, 10, 8),
        wiring(12, 13, 11),
    ];
    /// Pinout of the 7402 (outputs come first on each side).
    pub const NOR_WIRING: [GateWiring; 4] = [
        wiring(2, 3, 1),
        wiring(5, 6, 4),
        wiring(8, 9, 10),
        wiring(11, 12, 13),
    ];

    /// Creates a quad package of `op` gates wired as `wiring`.
    pub fn new(op: GateOp, wiring: [GateWiring; 4]) -> Self {
        Self { op, wiring }
    }
}
impl IcBehavior for QuadGate {
    fn step(&self, _state: &IcState, inputs: &PinValues) -> Step {
        let outputs = self.wiring.iter()
            .map(|w| {
                let a = inputs.get_or(w.a, LogicState::Low);
                let b = inputs.get_or(w.b, LogicState::Low);
                (w.y, self.op.apply(a, b))
            })
            .collect();

        Step { state: IcState::Stateless, outputs }
    }
}

/// The 7404 hex inverter.
///
/// Undriven inputs read as `0`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct HexInverter;
impl HexInverter {
    /// `(input, output)` pins of each inverter.
    pub const WIRING: [(PinId, PinId); 6] = [
        (PinId(1), PinId(2)),
        (PinId(3), PinId(4)),
        (PinId(5), PinId(6)),
        (PinId(9), PinId(8)),
        (PinId(11), PinId(10)),
        (PinId(13), PinId(12)),
    ];
}
impl IcBehavior for HexInverter {
    fn step(&self, _state: &IcState, inputs: &PinValues) -> Step {
        let outputs = Self::WIRING.iter()
            .map(|&(a, y)| (y, !inputs.get_or(a, LogicState::Low)))
            .collect();

        Step { state: IcState::Stateless, outputs }
    }
}
