#![warn(missing_docs)]
//! Simulation engine for a digital logic design trainer board.
//!
//! A board ([`circuit::Circuit`]) holds 74xx-series ICs, toggle switches, LEDs
//! and the jumper wires between them. [`sim::simulate`] evaluates the board in
//! four-valued logic ([`logic::LogicState`]), and [`truth_table::generate`]
//! sweeps a set of switches to tabulate the LEDs.
//!
//! ```
//! use dld_trainer_engine::{Circuit, IcType, Position, SimConfig, Terminal};
//!
//! let mut board = Circuit::new("NAND demo");
//! let (a, b) = (board.switch_by_label("SW0").unwrap(), board.switch_by_label("SW1").unwrap());
//! let led = board.led_by_label("L0").unwrap();
//!
//! let nand = board.add_ic(IcType::Ic7400, Position::new(120.0, 80.0));
//! board.add_wire(a, Terminal::pin(nand, 1));
//! board.add_wire(b, Terminal::pin(nand, 2));
//! board.add_wire(Terminal::pin(nand, 3), led);
//! board.set_power(true);
//!
//! board.simulate(&SimConfig::default());
//! assert!(board.led(led).unwrap().lit());
//! ```

pub mod catalog;
pub mod circuit;
pub mod error;
pub mod func;
pub mod logic;
pub mod sim;
pub mod truth_table;

pub use catalog::{IcType, PinId};
pub use circuit::{Circuit, IcKey, LedKey, Position, SwitchKey, Terminal, WireKey};
pub use error::CircuitError;
pub use logic::LogicState;
pub use sim::{SimConfig, SimulationResult, Warning};

#[cfg(test)]
mod tests {
    use crate::func::IcState;
    use crate::logic::LogicState::{High, Low};
    use crate::sim::Propagation;

    use super::*;

    /// A powered board with the standard switches and LEDs.
    fn board() -> Circuit {
        let mut c = Circuit::new("test");
        c.set_power(true);
        c
    }
    fn sw(c: &Circuit, i: usize) -> SwitchKey {
        c.switch_by_label(&format!("SW{i}")).unwrap()
    }
    fn led(c: &Circuit, i: usize) -> LedKey {
        c.led_by_label(&format!("L{i}")).unwrap()
    }
    fn floating(result: &SimulationResult) -> Vec<String> {
        result.warnings.iter()
            .filter(|w| matches!(w, Warning::FloatingInput { .. }))
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn nand_from_switches() {
        let mut c = board();
        let (a, b, l0) = (sw(&c, 0), sw(&c, 1), led(&c, 0));
        let nand = c.add_ic(IcType::Ic7400, Position::default());
        c.add_wire(a, Terminal::pin(nand, 1));
        c.add_wire(b, Terminal::pin(nand, 2));
        c.add_wire(Terminal::pin(nand, 3), l0);

        for (va, vb, out) in [(true, true, Low), (true, false, High), (false, true, High), (false, false, High)] {
            c.set_switch(a, va);
            c.set_switch(b, vb);
            let result = c.simulate(&SimConfig::default());
            assert_eq!(result.output(l0), Some(out), "NAND({va}, {vb})");
            assert_eq!(c.led(l0).map(|l| l.lit()), Some(out == High));
            assert_eq!(c.ic(nand).and_then(|ic| ic.pin_states().get(PinId(3))), Some(out));
        }
    }

    #[test]
    fn inverter_from_switch() {
        let mut c = board();
        let (a, l0) = (sw(&c, 0), led(&c, 0));
        let inv = c.add_ic(IcType::Ic7404, Position::default());
        c.add_wire(a, Terminal::pin(inv, 1));
        c.add_wire(Terminal::pin(inv, 2), l0);

        c.set_switch(a, true);
        assert_eq!(c.simulate(&SimConfig::default()).output(l0), Some(Low));
        c.set_switch(a, false);
        assert_eq!(c.simulate(&SimConfig::default()).output(l0), Some(High));
    }

    #[test]
    fn power_off() {
        let mut c = board();
        let l0 = led(&c, 0);
        let inv = c.add_ic(IcType::Ic7404, Position::default());
        c.add_ic(IcType::Ic7400, Position::default());
        c.add_wire(Terminal::pin(inv, 2), l0);
        c.simulate(&SimConfig::default());
        assert_eq!(c.led(l0).map(|l| l.lit()), Some(true));

        c.set_power(false);
        let result = c.simulate(&SimConfig::default());
        assert!(result.outputs.is_empty());
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings, [Warning::PowerOff]);
        assert_eq!(result.warning_messages(), ["Power is OFF. Turn on power to simulate."]);
        assert!(c.leds().all(|(_, l)| !l.lit()));
    }

    #[test]
    fn d_flip_flop() {
        let mut c = board();
        let (d, clk, q_led, qb_led) = (sw(&c, 0), sw(&c, 1), led(&c, 0), led(&c, 1));
        let ff = c.add_ic(IcType::Ic7474, Position::default());
        c.add_wire(d, Terminal::pin(ff, 2));
        c.add_wire(clk, Terminal::pin(ff, 3));
        c.add_wire(Terminal::pin(ff, 5), q_led);
        c.add_wire(Terminal::pin(ff, 6), qb_led);
        let config = SimConfig::default();

        c.set_switch(d, true);
        let r = c.simulate(&config);
        assert_eq!((r.output(q_led), r.output(qb_led)), (Some(Low), Some(High)), "no edge yet");

        c.set_switch(clk, true);
        let r = c.simulate(&config);
        assert_eq!((r.output(q_led), r.output(qb_led)), (Some(High), Some(Low)), "rising edge captures D");

        c.set_switch(d, false);
        assert_eq!(c.simulate(&config).output(q_led), Some(High), "clock held high");

        c.set_switch(clk, false);
        assert_eq!(c.simulate(&config).output(q_led), Some(High), "falling edge ignored");

        c.set_switch(clk, true);
        assert_eq!(c.simulate(&config).output(q_led), Some(Low));
    }

    #[test]
    fn jk_toggle_round_trip() {
        let mut c = board();
        let (jk, clk, q_led) = (sw(&c, 0), sw(&c, 1), led(&c, 0));
        let ff = c.add_ic(IcType::Ic7476, Position::default());
        c.add_wire(jk, Terminal::pin(ff, 4));
        c.add_wire(jk, Terminal::pin(ff, 16));
        c.add_wire(clk, Terminal::pin(ff, 1));
        c.add_wire(Terminal::pin(ff, 15), q_led);
        let config = SimConfig::default();

        c.set_switch(jk, true);
        c.set_switch(clk, true);
        assert_eq!(c.simulate(&config).output(q_led), Some(Low));

        let mut seen = vec![];
        for _ in 0..2 {
            c.set_switch(clk, false);
            seen.push(c.simulate(&config).output(q_led));
            c.set_switch(clk, true);
            c.simulate(&config);
        }
        assert_eq!(seen, [Some(High), Some(Low)]);

        let Some(IcState::FlipFlops(units)) = c.ic(ff).map(|ic| *ic.state()) else { panic!("expected flip-flop state") };
        assert_eq!(units[0].q, Low);
        assert_eq!(units[0].prev_clock, High);
    }

    #[test]
    fn floating_inputs() {
        let mut c = board();
        let a = sw(&c, 0);
        let nand = c.add_ic(IcType::Ic7400, Position::default());
        c.add_wire(a, Terminal::pin(nand, 1));

        let result = c.simulate(&SimConfig::default());
        assert_eq!(floating(&result), [
            "Floating input: 7400 1B",
            "Floating input: 7400 2A",
            "Floating input: 7400 2B",
            "Floating input: 7400 3A",
            "Floating input: 7400 3B",
            "Floating input: 7400 4A",
            "Floating input: 7400 4B",
        ]);
    }

    #[test]
    fn input_wired_to_input_floats() {
        let mut c = board();
        let l0 = led(&c, 0);
        let inv = c.add_ic(IcType::Ic7404, Position::default());
        c.add_wire(Terminal::pin(inv, 1), Terminal::pin(inv, 3));
        c.add_wire(Terminal::pin(inv, 2), l0);

        let result = c.simulate(&SimConfig::default());
        let warnings = floating(&result);
        assert!(warnings.contains(&"Floating input: 7404 1A".to_string()));
        assert!(warnings.contains(&"Floating input: 7404 2A".to_string()));
        assert_eq!(warnings.len(), 6);
        assert_eq!(result.output(l0), Some(High), "undriven input reads 0");
    }

    #[test]
    fn dangling_wire() {
        let mut c = board();
        let gone = c.add_ic(IcType::Ic7404, Position::default());
        let and = c.add_ic(IcType::Ic7408, Position::default());
        c.remove_ic(gone);
        c.add_wire(Terminal::pin(gone, 2), Terminal::pin(and, 1));

        let result = c.simulate(&SimConfig::default());
        assert!(result.errors.is_empty());
        assert!(floating(&result).contains(&"Floating input: 7408 1A".to_string()));
    }

    #[test]
    fn daisy_chain() {
        let mut c = board();
        let (a, b, l0, l1) = (sw(&c, 0), sw(&c, 1), led(&c, 0), led(&c, 1));
        let inv = c.add_ic(IcType::Ic7404, Position::default());
        let and = c.add_ic(IcType::Ic7408, Position::default());
        // SW0 reaches the AND only through the inverter's input pin
        c.add_wire(a, Terminal::pin(inv, 1));
        c.add_wire(Terminal::pin(inv, 1), Terminal::pin(and, 1));
        c.add_wire(b, Terminal::pin(and, 2));
        c.add_wire(Terminal::pin(and, 3), l0);
        c.add_wire(Terminal::pin(inv, 2), l1);

        c.set_switch(a, true);
        c.set_switch(b, true);
        let result = c.simulate(&SimConfig::default());
        assert_eq!(result.output(l0), Some(High));
        assert_eq!(result.output(l1), Some(Low));
        assert!(!floating(&result).contains(&"Floating input: 7408 1A".to_string()));
    }

    #[test]
    fn led_semantics() {
        let mut c = board();
        let (a, l0, l1, l2) = (sw(&c, 0), led(&c, 0), led(&c, 1), led(&c, 2));
        let inv = c.add_ic(IcType::Ic7404, Position::default());
        c.add_wire(a, Terminal::pin(inv, 1));
        c.add_wire(a, l0);
        // 1Y is 0 and 2Y is 1 (2A undriven)
        c.add_wire(Terminal::pin(inv, 2), l1);
        c.add_wire(Terminal::pin(inv, 4), l1);
        c.set_switch(a, true);

        let result = c.simulate(&SimConfig::default());
        assert_eq!(result.output(l0), Some(Low), "switches do not light LEDs");
        assert_eq!(result.output(l1), Some(High), "wired-OR");
        assert_eq!(result.output(l2), Some(Low), "unwired");
        assert_eq!(result.outputs.len(), 16);
    }

    /// Three inverters in series inside one package need several passes.
    #[test]
    fn inverter_chain() {
        let mut c = board();
        let (a, l0) = (sw(&c, 0), led(&c, 0));
        let inv = c.add_ic(IcType::Ic7404, Position::default());
        c.add_wire(a, Terminal::pin(inv, 1));
        c.add_wire(Terminal::pin(inv, 2), Terminal::pin(inv, 3));
        c.add_wire(Terminal::pin(inv, 4), Terminal::pin(inv, 5));
        c.add_wire(Terminal::pin(inv, 6), l0);
        c.set_switch(a, true);

        let one_pass = SimConfig { propagation: Propagation::Fixed { passes: 1 }, ..Default::default() };
        assert_eq!(sim::simulate(&c, &one_pass).result.output(l0), Some(High), "not yet propagated");
        assert_eq!(sim::simulate(&c, &SimConfig::default()).result.output(l0), Some(Low));

        let settle = SimConfig { propagation: Propagation::Settle { max_passes: 10 }, ..Default::default() };
        let sim = sim::simulate(&c, &settle);
        assert_eq!(sim.result.output(l0), Some(Low));
        assert_eq!(sim.passes, 3);
        assert!(!sim.result.warnings.iter().any(|w| matches!(w, Warning::DidNotSettle { .. })));
    }

    #[test]
    fn oscillator_does_not_settle() {
        let mut c = board();
        let inv = c.add_ic(IcType::Ic7404, Position::default());
        c.add_wire(Terminal::pin(inv, 2), Terminal::pin(inv, 1));

        let settle = SimConfig { propagation: Propagation::Settle { max_passes: 8 }, ..Default::default() };
        let result = c.simulate(&settle);
        assert_eq!(result.warnings.first(), Some(&Warning::DidNotSettle { passes: 8 }));
        assert!(!floating(&result).contains(&"Floating input: 7404 1A".to_string()));

        let result = c.simulate(&SimConfig::default());
        assert!(!result.warnings.iter().any(|w| matches!(w, Warning::DidNotSettle { .. })));
    }

    #[test]
    fn unimplemented_outputs_low() {
        let mut c = board();
        let l0 = led(&c, 0);
        let dec = c.add_ic(IcType::Ic74138, Position::default());
        for (i, pin) in [(1, 6), (2, 4), (3, 5)] {
            let s = sw(&c, i);
            c.add_wire(s, Terminal::pin(dec, pin));
        }
        c.set_switch(sw(&c, 1), true);
        c.add_wire(Terminal::pin(dec, 15), l0);

        let result = c.simulate(&SimConfig::default());
        assert_eq!(result.output(l0), Some(Low));
        let pins = c.ic(dec).map(|ic| *ic.pin_states()).unwrap_or_default();
        assert_eq!(pins.iter().count(), 8);
        assert!(pins.iter().all(|(_, v)| v == Low));
    }

    /// A clock held steady by an IC placed after the flip-flop is not an edge.
    #[test]
    fn clock_from_later_ic_holds() {
        let mut c = board();
        let (jk, other, q_led) = (sw(&c, 0), sw(&c, 5), led(&c, 0));
        let ff = c.add_ic(IcType::Ic7476, Position::default());
        let inv = c.add_ic(IcType::Ic7404, Position::default());
        c.add_wire(jk, Terminal::pin(ff, 4));
        c.add_wire(jk, Terminal::pin(ff, 16));
        // 1A is undriven, so 1Y holds the clock at 1
        c.add_wire(Terminal::pin(inv, 2), Terminal::pin(ff, 1));
        c.add_wire(Terminal::pin(ff, 15), q_led);
        c.set_switch(jk, true);

        let mut seen = vec![];
        for _ in 0..4 {
            c.toggle_switch(other);
            seen.push(c.simulate(&SimConfig::default()).output(q_led));
        }
        assert_eq!(seen, [Some(Low); 4]);
    }

    #[test]
    fn d_clock_from_later_ic() {
        let mut c = board();
        let (d, clk, q_led) = (sw(&c, 0), sw(&c, 1), led(&c, 0));
        let ff = c.add_ic(IcType::Ic7474, Position::default());
        let inv = c.add_ic(IcType::Ic7404, Position::default());
        c.add_wire(d, Terminal::pin(ff, 2));
        c.add_wire(clk, Terminal::pin(inv, 1));
        c.add_wire(Terminal::pin(inv, 2), Terminal::pin(ff, 3));
        c.add_wire(Terminal::pin(ff, 5), q_led);
        let config = SimConfig::default();

        // clock high through the inverter
        assert_eq!(c.simulate(&config).output(q_led), Some(Low));
        c.set_switch(d, true);
        assert_eq!(c.simulate(&config).output(q_led), Some(Low), "clock held high");

        c.set_switch(clk, true);
        assert_eq!(c.simulate(&config).output(q_led), Some(Low), "falling edge ignored");
        c.set_switch(clk, false);
        assert_eq!(c.simulate(&config).output(q_led), Some(High), "rising edge through the inverter");

        c.set_switch(d, false);
        assert_eq!(c.simulate(&config).output(q_led), Some(High));

        // a power cycle is not an edge either
        c.set_power(false);
        c.simulate(&config);
        c.set_power(true);
        assert_eq!(c.simulate(&config).output(q_led), Some(High));
    }

    /// Q' fed back into D halves the clock.
    #[test]
    fn d_divide_by_two() {
        let mut c = board();
        let (clk, q_led) = (sw(&c, 0), led(&c, 0));
        let ff = c.add_ic(IcType::Ic7474, Position::default());
        c.add_wire(Terminal::pin(ff, 6), Terminal::pin(ff, 2));
        c.add_wire(clk, Terminal::pin(ff, 3));
        c.add_wire(Terminal::pin(ff, 5), q_led);
        let config = SimConfig::default();
        c.simulate(&config);

        let mut seen = vec![];
        for _ in 0..4 {
            c.set_switch(clk, true);
            seen.push(c.simulate(&config).output(q_led));
            c.set_switch(clk, false);
            c.simulate(&config);
        }
        assert_eq!(seen, [Some(High), Some(Low), Some(High), Some(Low)]);
    }

    #[test]
    fn circuit_json_round_trip() {
        let mut c = board().with_id("board-1");
        let (a, l0) = (sw(&c, 0), led(&c, 0));
        let ff = c.add_ic(IcType::Ic7474, Position::new(10.0, 20.0));
        c.add_wire(a, Terminal::pin(ff, 2));
        c.add_wire(a, Terminal::pin(ff, 3));
        c.add_wire(Terminal::pin(ff, 5), l0);
        c.set_switch(a, true);
        c.simulate(&SimConfig::default());

        let json = serde_json::to_string(&c).unwrap();
        let mut restored: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.id, "board-1");
        assert_eq!(restored.ic(ff).map(|ic| *ic.state()), c.ic(ff).map(|ic| *ic.state()));
        assert_eq!(restored.simulate(&SimConfig::default()), c.simulate(&SimConfig::default()));
        assert_eq!(restored.led(l0).map(|l| l.lit()), Some(true));
    }
}
