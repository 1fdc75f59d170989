//! Exhaustive truth tables over a set of switches.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::circuit::{Circuit, LedKey, SwitchKey};
use crate::error::CircuitError;
use crate::logic::LogicState;
use crate::sim::{simulate, SimConfig};

/// A truth table: one row per input assignment, in counting order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TruthTable {
    /// Labels of the input switches (most significant first).
    pub input_labels: Vec<String>,
    /// Labels of the observed LEDs.
    pub output_labels: Vec<String>,
    /// Input assignment of each row.
    pub input_rows: Vec<Vec<LogicState>>,
    /// Observed LED levels of each row.
    pub output_rows: Vec<Vec<LogicState>>,
}
impl TruthTable {
    /// Number of rows (`2^inputs`).
    pub fn len(&self) -> usize {
        self.input_rows.len()
    }
    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.input_rows.is_empty()
    }

    /// Iterates over `(inputs, outputs)` row pairs.
    pub fn rows(&self) -> impl Iterator<Item = (&[LogicState], &[LogicState])> {
        self.input_rows.iter()
            .zip(&self.output_rows)
            .map(|(i, o)| (i.as_slice(), o.as_slice()))
    }
}
impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<_> = self.input_labels.iter().map(String::as_str).collect();
        let outputs: Vec<_> = self.output_labels.iter().map(String::as_str).collect();
        writeln!(f, "{} | {}", header.join(" "), outputs.join(" "))?;

        let widths: Vec<_> = self.input_labels.iter().chain(&self.output_labels)
            .map(|l| l.chars().count().max(1))
            .collect();
        for (inputs, outputs) in self.rows() {
            let (iw, ow) = widths.split_at(inputs.len().min(widths.len()));
            let fmt_row = |vals: &[LogicState], ws: &[usize]| vals.iter()
                .zip(ws)
                .map(|(v, &w)| format!("{:<w$}", v.to_string()))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{} | {}", fmt_row(inputs, iw), fmt_row(outputs, ow))?;
        }
        Ok(())
    }
}

/// Generates the truth table of a circuit.
///
/// For row `i`, the `k`-th input switch is set to bit `len - 1 - k` of `i`,
/// then a copy of the circuit is simulated from its current state.
/// Outputs that were not simulated (e.g. power off) read `0`.
/// The given circuit is not modified.
///
/// This runs `2^inputs.len()` simulations; see [`generate_checked`] for a bounded form.
///
/// # Panics
///
/// Panics if the row count `2^inputs.len()` does not fit in a `usize`.
/// Far smaller tables already fail to allocate.
pub fn generate(circuit: &Circuit, inputs: &[SwitchKey], outputs: &[LedKey], config: &SimConfig) -> TruthTable {
    let label_of = |label: Option<&str>| label.unwrap_or_default().to_string();
    let input_labels = inputs.iter().map(|&k| label_of(circuit.switch(k).map(|s| s.label.as_str()))).collect();
    let output_labels = outputs.iter().map(|&k| label_of(circuit.led(k).map(|l| l.label.as_str()))).collect();

    let n = inputs.len();
    let rows = u32::try_from(n).ok()
        .and_then(|n| 1usize.checked_shl(n))
        .expect("too many truth table inputs");
    debug!(inputs = n, outputs = outputs.len(), rows, "generating truth table");

    let mut input_rows = Vec::with_capacity(rows);
    let mut output_rows = Vec::with_capacity(rows);
    for row in 0..rows {
        let assignment: Vec<_> = (0..n)
            .map(|k| (row >> (n - 1 - k)) & 1 == 1)
            .collect();

        let mut copy = circuit.clone();
        for (&sw, &on) in inputs.iter().zip(&assignment) {
            copy.set_switch(sw, on);
        }
        let result = simulate(&copy, config).result;

        input_rows.push(assignment.into_iter().map(LogicState::from).collect());
        output_rows.push(outputs.iter().map(|&led| result.output(led).unwrap_or(LogicState::Low)).collect());
    }

    TruthTable { input_labels, output_labels, input_rows, output_rows }
}

/// Generates a truth table, rejecting more inputs than `config.max_truth_table_inputs`.
pub fn generate_checked(circuit: &Circuit, inputs: &[SwitchKey], outputs: &[LedKey], config: &SimConfig) -> Result<TruthTable, CircuitError> {
    if inputs.len() > config.max_truth_table_inputs {
        return Err(CircuitError::TooManyInputs { requested: inputs.len(), limit: config.max_truth_table_inputs });
    }
    Ok(generate(circuit, inputs, outputs, config))
}
