//! Rule-based error classifier
//!
//! Lower-cases the input and tests [`RULES`] in order; the first matching
//! substring wins. Rules only ever get appended, never reordered, so the
//! precedence of overlapping patterns stays fixed.

use crate::diagnosis::Diagnosis;

/// One substring rule and the diagnosis it yields
struct Rule {
    /// Lower-case substrings, any of which selects this rule
    patterns: &'static [&'static str],
    kind: &'static str,
    cause: &'static str,
    solution: &'static str,
    prevention: &'static str,
}

impl Rule {
    fn matches(&self, lower: &str) -> bool {
        self.patterns.iter().any(|p| lower.contains(p))
    }

    fn diagnosis(&self) -> Diagnosis {
        Diagnosis::new(self.kind, self.cause, self.solution, self.prevention)
    }
}

const RULES: &[Rule] = &[
    Rule {
        patterns: &["undefined is not an object"],
        kind: "Null Reference Error",
        cause: "Attempting to access properties on an undefined object",
        solution: "Add null checks before accessing properties",
        prevention: "Use static typing and initialize variables",
    },
    Rule {
        patterns: &["cannot read property"],
        kind: "Property Access Error",
        cause: "Trying to access a property on null/undefined",
        solution: "Use optional chaining or add null checks",
        prevention: "Add proper type checking and default values",
    },
    Rule {
        patterns: &["is not a function"],
        kind: "Type Error",
        cause: "Calling a value that is not a function, often an undefined callback or a wrong import",
        solution: "Check the import and that the callback prop is passed before calling it",
        prevention: "Type component props and guard optional callbacks",
    },
    Rule {
        patterns: &["unable to resolve module"],
        kind: "Module Resolution Error",
        cause: "Metro bundler cannot find the imported module",
        solution: "Install the missing package and restart Metro with a cleared cache",
        prevention: "Keep dependencies in package.json in sync and verify import paths",
    },
    Rule {
        patterns: &["maximum update depth exceeded", "too many re-renders"],
        kind: "Render Loop Error",
        cause: "State is updated during render or in an effect without a dependency guard",
        solution: "Move state updates into event handlers or add correct effect dependencies",
        prevention: "Never call setState unconditionally during render",
    },
    Rule {
        patterns: &["invariant violation"],
        kind: "Invariant Violation",
        cause: "A React Native internal assertion failed, often a component rendered outside its required parent",
        solution: "Read the invariant message and check component nesting and native module linking",
        prevention: "Follow library setup guides and rebuild the native app after adding native modules",
    },
];

const GENERAL_SOLUTION: &str = "Check component lifecycle and props";
const GENERAL_PREVENTION: &str = "Add error boundaries and logging";

/// Classify an error message without any remote help
///
/// Total and deterministic. When no rule matches, the cause is the
/// original input with its case preserved.
#[must_use]
pub fn classify(error_text: &str) -> Diagnosis {
    let lower = error_text.to_lowercase();

    RULES
        .iter()
        .find(|rule| rule.matches(&lower))
        .map(Rule::diagnosis)
        .unwrap_or_else(|| {
            Diagnosis::new(
                "General Error",
                error_text,
                GENERAL_SOLUTION,
                GENERAL_PREVENTION,
            )
        })
}
