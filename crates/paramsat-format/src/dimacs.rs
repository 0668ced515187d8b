//! DIMACS CNF format.
//!
//! Standard format used in SAT competitions and accepted by every solver
//! the oracle drives.

use paramsat_base::{ClauseCollection, Error, Result};
use std::fmt::Write as _;
use std::io::{BufRead, BufReader, Read};

/// A DIMACS CNF formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimacsCnf {
    /// Number of variables.
    pub num_vars: usize,
    /// Clauses as vectors of literals.
    pub clauses: Vec<Vec<i64>>,
}

impl DimacsCnf {
    /// Lowers a clause collection.
    ///
    /// The unit clause for the constant-true variable comes first, so every
    /// solver agrees on the meaning of `⊤`.
    #[must_use]
    pub fn from_collection(col: &ClauseCollection) -> Self {
        let truth = col.registry().truth();
        let mut clauses = Vec::with_capacity(col.len() + 1);
        clauses.push(vec![truth.to_dimacs()]);
        clauses.extend(col.clauses().iter().map(|c| c.to_dimacs()));
        Self {
            num_vars: col.registry().len(),
            clauses,
        }
    }

    /// Parses DIMACS CNF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let reader = BufReader::new(reader);
        let mut num_vars = 0;
        let mut clauses = Vec::new();
        let mut header_found = false;
        let mut clause = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('c') || line.starts_with('%') {
                continue;
            }

            if line.starts_with('p') {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() < 4 || parts[1] != "cnf" {
                    return Err(Error::Serialization(format!("Malformed header: {line}")));
                }
                num_vars = parts[2]
                    .parse()
                    .map_err(|e| Error::Serialization(format!("Invalid variable count: {e}")))?;
                let num_clauses: usize = parts[3]
                    .parse()
                    .map_err(|e| Error::Serialization(format!("Invalid clause count: {e}")))?;
                clauses.reserve(num_clauses);
                header_found = true;
                continue;
            }

            if !header_found {
                return Err(Error::Serialization(
                    "DIMACS header 'p cnf ...' not found".to_string(),
                ));
            }

            // Clauses may span lines; only 0 terminates one.
            for token in line.split_whitespace() {
                let lit: i64 = token
                    .parse()
                    .map_err(|e| Error::Serialization(format!("Invalid literal {token:?}: {e}")))?;
                if lit == 0 {
                    clauses.push(std::mem::take(&mut clause));
                } else {
                    if lit.unsigned_abs() as usize > num_vars {
                        return Err(Error::Serialization(format!(
                            "Literal {lit} exceeds declared variable count {num_vars}"
                        )));
                    }
                    clause.push(lit);
                }
            }
        }
        if !clause.is_empty() {
            clauses.push(clause);
        }

        Ok(Self { num_vars, clauses })
    }

    /// Parses DIMACS CNF from a string.
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Converts to DIMACS text.
    #[must_use]
    pub fn to_dimacs(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "p cnf {} {}", self.num_vars, self.clauses.len());
        for clause in &self.clauses {
            for lit in clause {
                let _ = write!(out, "{lit} ");
            }
            out.push_str("0\n");
        }
        out
    }

    /// Returns whether `model` (true/false per literal sign) satisfies every clause.
    #[must_use]
    pub fn is_satisfied_by(&self, model: &[i64]) -> bool {
        let mut values = vec![None; self.num_vars + 1];
        for &lit in model {
            if let Some(slot) = values.get_mut(lit.unsigned_abs() as usize) {
                *slot = Some(lit > 0);
            }
        }
        self.clauses.iter().all(|clause| {
            clause.iter().any(|&lit| {
                values
                    .get(lit.unsigned_abs() as usize)
                    .copied()
                    .flatten()
                    .is_some_and(|value| value == (lit > 0))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paramsat_base::VariableRegistry;

    #[test]
    fn test_parse_dimacs() {
        let input = r"
c This is a comment
p cnf 3 2
1 -2 0
2 3 0
";
        let cnf = DimacsCnf::parse(input).unwrap();
        assert_eq!(cnf.num_vars, 3);
        assert_eq!(cnf.clauses.len(), 2);
        assert_eq!(cnf.clauses[0], vec![1, -2]);
        assert_eq!(cnf.clauses[1], vec![2, 3]);
    }

    #[test]
    fn test_clause_spanning_lines() {
        let cnf = DimacsCnf::parse("p cnf 3 1\n1 2\n-3 0\n").unwrap();
        assert_eq!(cnf.clauses, vec![vec![1, 2, -3]]);
    }

    #[test]
    fn test_missing_header() {
        assert!(DimacsCnf::parse("1 2 0\n").is_err());
        assert!(DimacsCnf::parse("p cnf 1 1\n2 0\n").is_err());
    }

    #[test]
    fn test_round_trip_text() {
        let cnf = DimacsCnf {
            num_vars: 2,
            clauses: vec![vec![1], vec![-1, 2]],
        };
        let text = cnf.to_dimacs();
        assert_eq!(text, "p cnf 2 2\n1 0\n-1 2 0\n");
        assert_eq!(DimacsCnf::parse(&text).unwrap(), cnf);
    }

    #[test]
    fn test_from_collection() {
        let registry = VariableRegistry::new();
        let x = registry.atom("x");
        let y = registry.atom("y");
        let mut col = paramsat_base::ClauseCollection::new(&registry);
        col.add([!x.clone(), y.clone()]);
        let cnf = DimacsCnf::from_collection(&col);
        assert_eq!(cnf.num_vars, 3);
        assert_eq!(cnf.clauses, vec![vec![1], vec![-2, 3]]);
        assert!(cnf.is_satisfied_by(&[1, -2, 3]));
        assert!(!cnf.is_satisfied_by(&[-1, 2, -3]));
    }
}
