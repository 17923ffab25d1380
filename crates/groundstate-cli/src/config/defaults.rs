/// Values used when neither the config file, a CLI flag nor `--set` provide one.
#[derive(Debug, Clone)]
pub struct DefaultsConfig {
    pub solver: &'static str,
    pub num_eigenvalues: usize,
    pub exact_max_qubits: usize,
    pub ansatz: &'static str,
    pub reps: usize,
    pub optimizer: &'static str,
    pub max_iterations: u64,
    pub tolerance: f64,
    pub initial_step: f64,
    pub gradient_step: f64,
    pub variational_max_qubits: usize,
    pub match_problem_sector: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            solver: "exact",
            num_eigenvalues: 1,
            exact_max_qubits: 14,
            ansatz: "excitations",
            reps: 1,
            optimizer: "nelder-mead",
            max_iterations: 1000,
            tolerance: 1e-8,
            initial_step: 0.5,
            gradient_step: 1e-5,
            variational_max_qubits: 16,
            match_problem_sector: true,
        }
    }
}
