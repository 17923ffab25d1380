use crate::cli::InspectArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use groundstate::core::io::descriptor_file::load_descriptor;
use groundstate::core::mapping::Mapping;
use groundstate::engine::problem::PreparedProblem;
use groundstate::engine::transform::Transformation;
use std::fmt::Write;
use tracing::info;

pub async fn run(args: InspectArgs) -> Result<()> {
    let descriptor = load_descriptor(&args.descriptor)?;
    let mapping = match &args.mapping {
        Some(name) => parser::parse_mapping(name).map_err(|e| CliError::Argument(e.to_string()))?,
        None => Mapping::default_for(descriptor.class()),
    };

    let mut transformation = Transformation::new(mapping);
    if args.two_qubit_reduction {
        transformation = transformation.with_two_qubit_reduction();
    }
    let prepared = transformation.prepare(&descriptor)?;
    info!(
        qubits = prepared.qubit.num_qubits(),
        terms = prepared.qubit.hamiltonian.num_terms(),
        "Hamiltonian mapped."
    );

    print!("{}", summarize(&prepared, mapping, args.two_qubit_reduction, args.terms));
    Ok(())
}

/// Header block followed by the `max_terms` largest-magnitude Pauli terms.
pub fn summarize(prepared: &PreparedProblem, mapping: Mapping, reduced: bool, max_terms: usize) -> String {
    let qubit = &prepared.qubit;
    let num_qubits = qubit.num_qubits();
    let mut out = String::new();

    let _ = writeln!(out, "=== QUBIT HAMILTONIAN ===");
    let _ = writeln!(out, "  Problem: {}", prepared.descriptor.class());
    if reduced {
        let _ = writeln!(out, "  Mapping: {} (two-qubit reduction)", mapping);
    } else {
        let _ = writeln!(out, "  Mapping: {}", mapping);
    }
    let _ = writeln!(out, "  Qubits: {}", num_qubits);
    let _ = writeln!(out, "  Pauli terms: {}", qubit.hamiltonian.num_terms());
    if let Some(state) = qubit.reference_state {
        let _ = writeln!(out, "  Reference state: |{:0width$b}⟩", state, width = num_qubits);
    }
    let _ = writeln!(out, "  Excitation generators: {}", qubit.excitations.len());
    if !qubit.aux_operators.is_empty() {
        let names: Vec<&str> = qubit.aux_operators.keys().map(String::as_str).collect();
        let _ = writeln!(out, "  Observables: {}", names.join(", "));
    }

    let mut terms: Vec<_> = qubit.hamiltonian.terms().collect();
    terms.sort_by(|(a_string, a), (b_string, b)| {
        b.norm()
            .total_cmp(&a.norm())
            .then_with(|| a_string.to_label(num_qubits).cmp(&b_string.to_label(num_qubits)))
    });

    let shown = max_terms.min(terms.len());
    let _ = writeln!(out);
    let _ = writeln!(out, "=== LEADING TERMS ({} of {}) ===", shown, terms.len());
    for (string, coefficient) in terms.into_iter().take(shown) {
        if coefficient.im.abs() > 1e-12 {
            let _ = writeln!(
                out,
                "  {}  {:+.10} {:+.10}i",
                string.to_label(num_qubits),
                coefficient.re,
                coefficient.im
            );
        } else {
            let _ = writeln!(out, "  {}  {:+.10}", string.to_label(num_qubits), coefficient.re);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../data")
            .join(name)
    }

    fn prepare(name: &str, mapping: Mapping, reduced: bool) -> PreparedProblem {
        let descriptor = load_descriptor(&sample(name)).unwrap();
        let mut transformation = Transformation::new(mapping);
        if reduced {
            transformation = transformation.with_two_qubit_reduction();
        }
        transformation.prepare(&descriptor).unwrap()
    }

    #[test]
    fn summary_of_reduced_h2_lists_five_terms_on_two_qubits() {
        let prepared = prepare("h2.toml", Mapping::Parity, true);
        let summary = summarize(&prepared, Mapping::Parity, true, 10);
        assert!(summary.contains("Mapping: parity (two-qubit reduction)"));
        assert!(summary.contains("Qubits: 2"));
        assert!(summary.contains("Pauli terms: 5"));
        assert!(summary.contains("=== LEADING TERMS (5 of 5) ==="));
    }

    #[test]
    fn summary_truncates_and_orders_terms_by_magnitude() {
        let prepared = prepare("h2.toml", Mapping::JordanWigner, false);
        let summary = summarize(&prepared, Mapping::JordanWigner, false, 3);
        assert!(summary.contains("Pauli terms: 15"));
        assert!(summary.contains("Reference state: |0101⟩"));
        assert!(summary.contains("=== LEADING TERMS (3 of 15) ==="));

        let magnitudes: Vec<f64> = summary
            .lines()
            .skip_while(|line| !line.starts_with("=== LEADING"))
            .skip(1)
            .filter_map(|line| line.split_whitespace().nth(1))
            .map(|value| value.parse::<f64>().unwrap().abs())
            .collect();
        assert_eq!(magnitudes.len(), 3);
        assert!(magnitudes.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn vibrational_summary_uses_direct_mapping() {
        let prepared = prepare("harmonic.toml", Mapping::Direct, false);
        let summary = summarize(&prepared, Mapping::Direct, false, 10);
        assert!(summary.contains("Problem: vibrational"));
        assert!(summary.contains("Qubits: 4"));
        assert!(summary.contains("Excitation generators: 3"));
    }

    #[tokio::test]
    async fn unknown_mapping_is_an_argument_error() {
        let args = InspectArgs {
            descriptor: sample("h2.toml"),
            mapping: Some("ternary".to_string()),
            two_qubit_reduction: false,
            terms: 10,
        };
        let err = run(args).await.unwrap_err();
        assert!(matches!(err, CliError::Argument(_)));
    }

    #[tokio::test]
    async fn unsupported_mapping_surfaces_engine_error() {
        let args = InspectArgs {
            descriptor: sample("h2.toml"),
            mapping: Some("direct".to_string()),
            two_qubit_reduction: false,
            terms: 10,
        };
        let err = run(args).await.unwrap_err();
        assert!(matches!(err, CliError::Engine(_)));
    }
}
