//! VM configuration.
//!
//! Options come from three places, later ones winning: `Default`, the
//! environment (`VmOptions::from_env`), and command-line flags applied by the
//! binary through the builder methods.

/// Environment variable enabling per-instruction tracing (`1`/`true`).
pub const TRACE_ENV: &str = "FERRULE_TRACE";
/// Environment variable holding the instruction budget.
pub const MAX_INSTRUCTIONS_ENV: &str = "FERRULE_MAX_INSTRUCTIONS";

/// Runtime knobs for a `Vm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VmOptions {
    /// Emit a `trace` event with the disassembled instruction and stack before each step.
    pub trace_execution: bool,
    /// Abort with `BudgetExhausted` after this many instructions in one `interpret` call.
    pub max_instructions: Option<u64>,
}

impl VmOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build options from an arbitrary key lookup. Unparsable values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let trace_execution = lookup(TRACE_ENV)
            .map(|v| v != "false" && v != "0" && !v.is_empty())
            .unwrap_or(false);
        let max_instructions = lookup(MAX_INSTRUCTIONS_ENV).and_then(|v| v.trim().parse().ok());

        Self {
            trace_execution,
            max_instructions,
        }
    }

    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.trace_execution = enabled;
        self
    }

    pub fn with_max_instructions(mut self, limit: Option<u64>) -> Self {
        self.max_instructions = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_defaults() {
        let options = VmOptions::from_lookup(|_| None);
        assert_eq!(options, VmOptions::default());
        assert!(!options.trace_execution);
        assert_eq!(options.max_instructions, None);
    }

    #[test]
    fn test_env_values() {
        let options = VmOptions::from_lookup(lookup_from(&[
            ("FERRULE_TRACE", "1"),
            ("FERRULE_MAX_INSTRUCTIONS", "5000"),
        ]));
        assert!(options.trace_execution);
        assert_eq!(options.max_instructions, Some(5000));
    }

    #[test]
    fn test_bad_values_ignored() {
        let options = VmOptions::from_lookup(lookup_from(&[
            ("FERRULE_TRACE", "false"),
            ("FERRULE_MAX_INSTRUCTIONS", "lots"),
        ]));
        assert!(!options.trace_execution);
        assert_eq!(options.max_instructions, None);
    }

    #[test]
    fn test_builder_overrides() {
        let options = VmOptions::new()
            .with_trace(true)
            .with_max_instructions(Some(10));
        assert!(options.trace_execution);
        assert_eq!(options.max_instructions, Some(10));
    }
}
