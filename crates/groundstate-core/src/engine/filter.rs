use super::config::FilterConfig;
use super::problem::{
    ANGULAR_MOMENTUM, MAGNETIZATION, ObservableValues, PARTICLE_NUMBER, occupation_key,
};
use crate::core::models::descriptor::ProblemDescriptor;
use std::fmt;

/// Tolerance used when comparing observables against their target value.
pub const FILTER_TOLERANCE: f64 = 1e-6;

type Predicate = Box<dyn Fn(f64, &ObservableValues) -> bool + Send + Sync>;

/// Accepts or rejects a candidate eigenstate from its eigenvalue and
/// auxiliary observable values.
///
/// An observable missing from the values fails the predicate.
pub struct FilterPredicate {
    description: String,
    predicate: Predicate,
}

impl FilterPredicate {
    pub fn new<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(f64, &ObservableValues) -> bool + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            predicate: Box::new(predicate),
        }
    }

    fn observable_equals(name: String, target: f64, description: String) -> Self {
        Self::new(description, move |_, values| {
            values
                .get(&name)
                .is_some_and(|v| (v - target).abs() <= FILTER_TOLERANCE)
        })
    }

    pub fn particle_number(n: f64) -> Self {
        Self::observable_equals(PARTICLE_NUMBER.to_string(), n, format!("particle_number = {n}"))
    }

    pub fn magnetization(m: f64) -> Self {
        Self::observable_equals(MAGNETIZATION.to_string(), m, format!("magnetization = {m}"))
    }

    pub fn angular_momentum(s2: f64) -> Self {
        Self::observable_equals(ANGULAR_MOMENTUM.to_string(), s2, format!("angular_momentum = {s2}"))
    }

    /// Every vibrational mode holds exactly one quantum.
    pub fn single_occupation_per_mode(num_modes: usize) -> Self {
        Self::new("one modal occupied per mode", move |_, values| {
            (0..num_modes).all(|m| {
                values
                    .get(&occupation_key(m))
                    .is_some_and(|v| (v - 1.0).abs() <= FILTER_TOLERANCE)
            })
        })
    }

    pub fn and(self, other: FilterPredicate) -> Self {
        let (a, b) = (self.predicate, other.predicate);
        Self {
            description: format!("{} and {}", self.description, other.description),
            predicate: Box::new(move |e, v| a(e, v) && b(e, v)),
        }
    }

    pub fn accepts(&self, eigenvalue: f64, values: &ObservableValues) -> bool {
        (self.predicate)(eigenvalue, values)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Builds the conjunction of every constraint in `config`, or `None` when
    /// the config imposes none.
    pub fn from_config(config: &FilterConfig, descriptor: &ProblemDescriptor) -> Option<Self> {
        let mut parts = Vec::new();
        if config.match_problem_sector {
            match descriptor {
                ProblemDescriptor::Electronic(e) => {
                    let (alpha, beta) = e.num_particles();
                    parts.push(Self::particle_number((alpha + beta) as f64));
                    parts.push(Self::magnetization((alpha as f64 - beta as f64) / 2.0));
                }
                ProblemDescriptor::Vibrational(v) => {
                    parts.push(Self::single_occupation_per_mode(v.num_modes()));
                }
            }
        }
        if let Some(n) = config.particle_number {
            parts.push(Self::particle_number(n));
        }
        if let Some(m) = config.magnetization {
            parts.push(Self::magnetization(m));
        }
        if let Some(s2) = config.angular_momentum {
            parts.push(Self::angular_momentum(s2));
        }
        if config.single_occupation_per_mode {
            if let ProblemDescriptor::Vibrational(v) = descriptor {
                parts.push(Self::single_occupation_per_mode(v.num_modes()));
            }
        }
        parts.into_iter().reduce(Self::and)
    }
}

impl fmt::Debug for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterPredicate")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{h2_descriptor, harmonic_descriptor};

    fn values(pairs: &[(&str, f64)]) -> ObservableValues {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn particle_number_uses_tolerance() {
        let filter = FilterPredicate::particle_number(2.0);
        assert!(filter.accepts(0.0, &values(&[("particle_number", 2.0 + 1e-9)])));
        assert!(!filter.accepts(0.0, &values(&[("particle_number", 1.0)])));
        assert!(!filter.accepts(0.0, &values(&[])));
    }

    #[test]
    fn and_requires_both() {
        let filter = FilterPredicate::particle_number(2.0).and(FilterPredicate::magnetization(0.0));
        assert!(filter.accepts(0.0, &values(&[("particle_number", 2.0), ("magnetization", 0.0)])));
        assert!(!filter.accepts(0.0, &values(&[("particle_number", 2.0), ("magnetization", 1.0)])));
        assert_eq!(filter.description(), "particle_number = 2 and magnetization = 0");
    }

    #[test]
    fn custom_predicate_sees_eigenvalue() {
        let filter = FilterPredicate::new("negative energy", |e, _| e < 0.0);
        assert!(filter.accepts(-1.0, &values(&[])));
        assert!(!filter.accepts(1.0, &values(&[])));
    }

    #[test]
    fn from_config_matches_problem_sector() {
        let config = FilterConfig {
            match_problem_sector: true,
            ..Default::default()
        };
        let filter = FilterPredicate::from_config(&config, &h2_descriptor().into()).unwrap();
        assert!(filter.accepts(0.0, &values(&[("particle_number", 2.0), ("magnetization", 0.0)])));

        let vib = FilterPredicate::from_config(&config, &harmonic_descriptor().into()).unwrap();
        assert!(vib.accepts(
            0.0,
            &values(&[("occupation_mode_0", 1.0), ("occupation_mode_1", 1.0)])
        ));
        assert!(!vib.accepts(
            0.0,
            &values(&[("occupation_mode_0", 0.0), ("occupation_mode_1", 1.0)])
        ));
    }

    #[test]
    fn empty_config_builds_no_filter() {
        assert!(FilterPredicate::from_config(&FilterConfig::default(), &h2_descriptor().into()).is_none());
    }
}
