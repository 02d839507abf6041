//! Runtime parameter substitution

use stepwright_core_types::RUNTIME_PARAMETER;
use tracing::warn;

/// Hands out step literals, left to right, to runtime placeholders.
///
/// The cursor is shared by all actions of a step: the first placeholder in
/// the plan takes the first literal, the next one the second, and so on.
#[derive(Debug, Clone)]
pub struct ParameterCursor {
    literals: Vec<String>,
    next: usize,
}

impl ParameterCursor {
    pub fn new(literals: Vec<String>) -> Self {
        Self { literals, next: 0 }
    }

    /// Replace every placeholder occurrence in `value`.
    ///
    /// When literals run out the placeholder text stays in place.
    pub fn substitute(&mut self, value: &str) -> String {
        if !value.contains(RUNTIME_PARAMETER) {
            return value.to_string();
        }

        let mut parts = value.split(RUNTIME_PARAMETER);
        let mut out = parts.next().unwrap_or_default().to_string();
        for rest in parts {
            match self.literals.get(self.next) {
                Some(literal) => {
                    out.push_str(literal);
                    self.next += 1;
                }
                None => {
                    warn!(
                        supplied = self.literals.len(),
                        "Step has fewer literals than placeholders"
                    );
                    out.push_str(RUNTIME_PARAMETER);
                }
            }
            out.push_str(rest);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(literals: &[&str]) -> ParameterCursor {
        ParameterCursor::new(literals.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn placeholders_take_literals_in_order() {
        let mut params = cursor(&["Dallas", "Houston"]);
        assert_eq!(params.substitute(RUNTIME_PARAMETER), "Dallas");
        assert_eq!(params.substitute("no placeholder"), "no placeholder");
        assert_eq!(params.substitute(RUNTIME_PARAMETER), "Houston");
        assert_eq!(params.substitute(RUNTIME_PARAMETER), RUNTIME_PARAMETER);
    }

    #[test]
    fn embedded_placeholders_are_replaced() {
        let mut params = cursor(&["Ada", "Lovelace"]);
        let value = format!("{} {}!", RUNTIME_PARAMETER, RUNTIME_PARAMETER);
        assert_eq!(params.substitute(&value), "Ada Lovelace!");
    }

    #[test]
    fn missing_literals_leave_placeholder() {
        let mut params = cursor(&[]);
        assert_eq!(params.substitute(RUNTIME_PARAMETER), RUNTIME_PARAMETER);

        let mut params = cursor(&["a", "b", "c"]);
        assert_eq!(params.substitute(RUNTIME_PARAMETER), "a");
        assert_eq!(params.substitute(RUNTIME_PARAMETER), "b");
    }
}
