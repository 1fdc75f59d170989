use crate::catalog::{lookup, IcType, PinRole};
use crate::func::{IcBehavior, IcState, PinValues, Step};
use crate::logic::LogicState;

/// Behavior of catalogued ICs that are not simulated yet
/// (counters, decoders, multiplexers and the BCD to 7-segment driver).
///
/// Every declared output pin is held at `0` regardless of the inputs.
/// This is a known coverage gap rather than a modelling choice:
/// the pinout is real, the logic behind it is not.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Unimplemented {
    ic_type: IcType,
}
impl Unimplemented {
    /// Creates the placeholder behavior for an IC type.
    pub fn new(ic_type: IcType) -> Self {
        Self { ic_type }
    }
}
impl IcBehavior for Unimplemented {
    fn step(&self, state: &IcState, _inputs: &PinValues) -> Step {
        let outputs = lookup(self.ic_type)
            .pins_with_role(PinRole::Output)
            .map(|p| (p.id, LogicState::Low))
            .collect();

        Step { state: *state, outputs }
    }
}
