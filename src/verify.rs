use cmul_math::ComplexFixed;
use std::fmt;

/// A failed comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub label: String,
    pub expected: ComplexFixed,
    pub found: ComplexFixed,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // same values, so the formats differ
        if self.expected.parts() == self.found.parts() {
            write!(
                f,
                "Result mismatch!\nexpected:\t{} {}\nfound:\t{} {}",
                self.expected,
                self.expected.format(),
                self.found,
                self.found.format()
            )
        } else {
            write!(
                f,
                "Result mismatch!\nexpected:\t{}\nfound:\t{}",
                self.expected, self.found
            )
        }
    }
}

/// Accumulates comparisons for one run.
///
/// The failure flag is a logical OR over every check and is never cleared.
#[derive(Debug, Default)]
pub struct Verifier {
    failed: bool,
    checks: usize,
    mismatches: Vec<Mismatch>,
}

impl Verifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `found` with `expected`; returns whether they matched.
    pub fn check(&mut self, label: &str, expected: &ComplexFixed, found: &ComplexFixed) -> bool {
        self.checks += 1;
        if expected == found {
            tracing::debug!(label, result = %found, "check passed");
            return true;
        }

        let mismatch = Mismatch {
            label: label.to_string(),
            expected: *expected,
            found: *found,
        };
        tracing::error!(label, "{}", mismatch);
        self.mismatches.push(mismatch);
        self.failed = true;
        false
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn checks(&self) -> usize {
        self.checks
    }

    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    pub fn into_mismatches(self) -> Vec<Mismatch> {
        self.mismatches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmul_math::Format;

    fn c(re: i128, im: i128) -> ComplexFixed {
        ComplexFixed::from_parts(re, im, Format::signed(21).unwrap()).unwrap()
    }

    #[test]
    fn test_match_keeps_passing() {
        let mut v = Verifier::new();
        assert!(v.check("a", &c(-150, 200), &c(-150, 200)));
        assert!(!v.failed());
        assert_eq!(v.checks(), 1);
    }

    #[test]
    fn test_failure_is_sticky() {
        let mut v = Verifier::new();
        assert!(!v.check("bad", &c(-150, 200), &c(-150, 0)));
        assert!(v.failed());

        // later passes never clear the flag
        assert!(v.check("good", &c(1, 1), &c(1, 1)));
        assert!(v.failed());
        assert_eq!(v.checks(), 2);
        assert_eq!(v.mismatches().len(), 1);
        assert_eq!(v.mismatches()[0].label, "bad");
    }

    #[test]
    fn test_either_component_fails() {
        let mut v = Verifier::new();
        assert!(!v.check("re", &c(1, 2), &c(0, 2)));
        assert!(!v.check("im", &c(1, 2), &c(1, 3)));
        assert_eq!(v.mismatches().len(), 2);
    }

    #[test]
    fn test_format_difference_is_a_mismatch() {
        let mut v = Verifier::new();
        let narrow = ComplexFixed::from_parts(-150, 200, Format::signed(12).unwrap()).unwrap();
        assert!(!v.check("fmt", &c(-150, 200), &narrow));
    }

    #[test]
    fn test_diagnostic_text() {
        let m = Mismatch {
            label: "test_mult".to_string(),
            expected: c(-150, 200),
            found: c(-150, 199),
        };
        assert_eq!(
            m.to_string(),
            "Result mismatch!\nexpected:\t(-150, 200)\nfound:\t(-150, 199)"
        );
    }

    #[test]
    fn test_diagnostic_names_differing_formats() {
        let m = Mismatch {
            label: "fmt".to_string(),
            expected: c(-150, 200),
            found: ComplexFixed::from_parts(-150, 200, Format::signed(12).unwrap()).unwrap(),
        };
        assert_eq!(
            m.to_string(),
            "Result mismatch!\nexpected:\t(-150, 200) i21\nfound:\t(-150, 200) i12"
        );
    }
}
