use cmul_math::{ComplexFixed, FixedPointError, Format};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid case file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Case `{label}`: {source}")]
    Value {
        label: String,
        #[source]
        source: FixedPointError,
    },
    #[error("Case file contains no cases")]
    Empty,
}

/// Two inputs, the value the multiplier must produce, and the output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub label: String,
    pub a: ComplexFixed,
    pub b: ComplexFixed,
    pub expected: ComplexFixed,
    pub output: Format,
}

/// `(10 + 20j) * (5 + 10j)` at `i10`, read back at `i21`: `-150 + 200j`.
pub fn reference_cases() -> Result<Vec<TestCase>, FixedPointError> {
    let i10 = Format::signed(10)?;
    let i21 = Format::signed(21)?;
    Ok(vec![TestCase {
        label: "test_mult".to_string(),
        a: ComplexFixed::from_parts(10, 20, i10)?,
        b: ComplexFixed::from_parts(5, 10, i10)?,
        expected: ComplexFixed::from_parts(-150, 200, i21)?,
        output: i21,
    }])
}

/// One complex operand as written in a case file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperandSpec {
    pub format: Format,
    /// `[real, imag]`
    pub value: [i128; 2],
}

impl OperandSpec {
    fn build(&self) -> Result<ComplexFixed, FixedPointError> {
        ComplexFixed::from_parts(self.value[0], self.value[1], self.format)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseSpec {
    pub label: String,
    pub a: OperandSpec,
    pub b: OperandSpec,
    pub expected: [i128; 2],
    /// Output buffer format; the inferred `W1 + W2 + 1` format when omitted
    #[serde(default)]
    pub output: Option<Format>,
}

impl CaseSpec {
    pub fn build(&self) -> Result<TestCase, CaseError> {
        self.build_values().map_err(|source| CaseError::Value {
            label: self.label.clone(),
            source,
        })
    }

    fn build_values(&self) -> Result<TestCase, FixedPointError> {
        let a = self.a.build()?;
        let b = self.b.build()?;
        let output = match self.output {
            Some(format) => format,
            None => Format::complex_product(a.format(), b.format())?,
        };
        let expected = ComplexFixed::from_parts(self.expected[0], self.expected[1], output)?;
        Ok(TestCase {
            label: self.label.clone(),
            a,
            b,
            expected,
            output,
        })
    }
}

/// On-disk list of cases (JSON).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFile {
    pub cases: Vec<CaseSpec>,
}

impl CaseFile {
    pub fn parse(json: &str) -> Result<Vec<TestCase>, CaseError> {
        let file: CaseFile = serde_json::from_str(json)?;
        if file.cases.is_empty() {
            return Err(CaseError::Empty);
        }
        file.cases.iter().map(CaseSpec::build).collect()
    }
}

pub fn load_cases(path: &Path) -> Result<Vec<TestCase>, CaseError> {
    let json = std::fs::read_to_string(path)?;
    CaseFile::parse(&json)
}
