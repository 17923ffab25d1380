use groundstate::core::mapping::Mapping;
use groundstate::engine::config::{AnsatzKind, OptimizerKind};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid KEY=VALUE pair '{0}'. Expected e.g. 'solver.vqe.reps=2'.")]
    InvalidKeyValue(String),

    #[error("{0}")]
    UnknownMapping(String),

    #[error("Unknown optimizer '{0}'. Expected 'nelder-mead' or 'lbfgs'.")]
    UnknownOptimizer(String),

    #[error(
        "Unknown ansatz '{0}'. Expected 'excitations', 'real-amplitudes' or 'efficient-su2'."
    )]
    UnknownAnsatz(String),
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('_', "-")
}

/// Splits `key=value`; the key must be non-empty.
pub fn parse_key_value(pair: &str) -> Result<(&str, &str), ParseError> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(ParseError::InvalidKeyValue(pair.to_string())),
    }
}

pub fn parse_mapping(name: &str) -> Result<Mapping, ParseError> {
    name.parse().map_err(ParseError::UnknownMapping)
}

pub fn parse_optimizer(name: &str) -> Result<OptimizerKind, ParseError> {
    match normalize(name).as_str() {
        "nelder-mead" | "neldermead" => Ok(OptimizerKind::NelderMead),
        "lbfgs" | "l-bfgs" => Ok(OptimizerKind::Lbfgs),
        _ => Err(ParseError::UnknownOptimizer(name.to_string())),
    }
}

/// `reps` is ignored by the excitation ansatz.
pub fn parse_ansatz(name: &str, reps: usize) -> Result<AnsatzKind, ParseError> {
    match normalize(name).as_str() {
        "excitations" | "uccsd" | "uvccsd" => Ok(AnsatzKind::Excitations),
        "real-amplitudes" => Ok(AnsatzKind::RealAmplitudes { reps }),
        "efficient-su2" => Ok(AnsatzKind::EfficientSu2 { reps }),
        _ => Err(ParseError::UnknownAnsatz(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_pairs_are_split_on_first_equals() {
        assert_eq!(
            parse_key_value("solver.vqe.initial-point=0.1=0.2").unwrap(),
            ("solver.vqe.initial-point", "0.1=0.2")
        );
        assert_eq!(parse_key_value(" mapping = parity ").unwrap(), ("mapping", "parity"));
    }

    #[test]
    fn malformed_key_value_pairs_are_rejected() {
        assert_eq!(
            parse_key_value("mapping"),
            Err(ParseError::InvalidKeyValue("mapping".to_string()))
        );
        assert!(parse_key_value("=parity").is_err());
    }

    #[test]
    fn mapping_names_accept_short_forms() {
        assert_eq!(parse_mapping("jw").unwrap(), Mapping::JordanWigner);
        assert_eq!(parse_mapping("Bravyi_Kitaev").unwrap(), Mapping::BravyiKitaev);
        assert!(matches!(parse_mapping("ternary"), Err(ParseError::UnknownMapping(_))));
    }

    #[test]
    fn optimizer_and_ansatz_names_are_normalized() {
        assert_eq!(parse_optimizer("L-BFGS").unwrap(), OptimizerKind::Lbfgs);
        assert_eq!(parse_optimizer("nelder_mead").unwrap(), OptimizerKind::NelderMead);
        assert_eq!(
            parse_ansatz("real_amplitudes", 3).unwrap(),
            AnsatzKind::RealAmplitudes { reps: 3 }
        );
        assert_eq!(parse_ansatz("uccsd", 3).unwrap(), AnsatzKind::Excitations);
        assert_eq!(
            parse_ansatz("qaoa", 1),
            Err(ParseError::UnknownAnsatz("qaoa".to_string()))
        );
    }
}
