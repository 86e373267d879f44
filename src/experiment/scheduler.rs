//! Timed parameter changes read from an experiment definition.
//!
//! ```text
//! # comment
//! o= pa cna vp
//! aark 2.0
//! t= 1440
//! nid 0.5
//! t= 10080
//! end-exp
//! ```
//!
//! Changes before the first `t=` line form an opening set applied at t = 0.
//! Each `t=` line opens a new set; the last declared time ends the run.

use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;

use thiserror::Error;

use crate::config::Parameters;
use crate::state::{Registry, RegistryError};

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("failed to open experiment {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read experiment line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: expected `t= <time>`, found '{text}'")]
    InvalidTime { line: usize, text: String },
    #[error("line {line}: expected `<parameter> <value>`, found '{text}'")]
    Malformed { line: usize, text: String },
    #[error("line {line}: {source}")]
    UnknownParameter {
        line: usize,
        #[source]
        source: RegistryError,
    },
}

/// One parameter assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub name: String,
    pub value: f64,
}

/// Parameter changes applied together at one time.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSet {
    pub at_time: f64,
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, Default)]
pub struct Experiment {
    sets: Vec<ChangeSet>,
    /// Index of the first set not yet applied
    next: usize,
    times: Vec<f64>,
    outputs: Vec<String>,
}

impl Experiment {
    /// An experiment with no changes and no declared outputs.
    pub fn empty() -> Self {
        Self {
            sets: vec![ChangeSet {
                at_time: 0.0,
                changes: Vec::new(),
            }],
            ..Default::default()
        }
    }

    pub fn load<P: AsRef<Path>>(
        path: P,
        params: &Registry<Parameters>,
    ) -> Result<Self, ExperimentError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| ExperimentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let exp = Self::parse(std::io::BufReader::new(file), params)?;
        log::info!(
            "Loaded experiment {:?}: {} change sets, {} outputs",
            path,
            exp.sets.len(),
            exp.outputs.len()
        );
        Ok(exp)
    }

    /// Parses an experiment definition. Parameter names are checked against
    /// `params`; the first bad line aborts parsing.
    pub fn parse<R: BufRead>(
        reader: R,
        params: &Registry<Parameters>,
    ) -> Result<Self, ExperimentError> {
        let mut exp = Self::empty();

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line.map_err(|source| ExperimentError::Read {
                line: line_no,
                source,
            })?;
            let text = line.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            let mut words = text.split_whitespace();
            let Some(first) = words.next() else {
                continue;
            };
            match first {
                "t=" => {
                    let at_time = words
                        .next()
                        .and_then(|w| w.parse::<f64>().ok())
                        .filter(|t| t.is_finite())
                        .ok_or_else(|| ExperimentError::InvalidTime {
                            line: line_no,
                            text: text.to_string(),
                        })?;
                    exp.times.push(at_time);
                    exp.sets.push(ChangeSet {
                        at_time,
                        changes: Vec::new(),
                    });
                }
                "o=" => exp.outputs.extend(words.map(str::to_string)),
                "end-exp" => break,
                name => {
                    let value = words
                        .next()
                        .and_then(|w| w.parse::<f64>().ok())
                        .ok_or_else(|| ExperimentError::Malformed {
                            line: line_no,
                            text: text.to_string(),
                        })?;
                    if !params.contains(name) {
                        return Err(ExperimentError::UnknownParameter {
                            line: line_no,
                            source: RegistryError::UnknownName {
                                kind: "parameter",
                                name: name.to_string(),
                            },
                        });
                    }
                    if let Some(set) = exp.sets.last_mut() {
                        set.changes.push(Change {
                            name: name.to_string(),
                            value,
                        });
                    }
                }
            }
        }

        // Sets run in time order whatever order the `t=` lines came in; the
        // opening set stays first and equal times keep their file order.
        exp.sets[1..].sort_by(|a, b| a.at_time.total_cmp(&b.at_time));
        exp.times.sort_by(f64::total_cmp);
        Ok(exp)
    }

    /// Applies every pending change-set due at `time`, in order, each once.
    /// Returns the number of sets applied.
    pub fn update(&mut self, time: f64, p: &mut Parameters, params: &Registry<Parameters>) -> usize {
        let mut applied = 0;
        while let Some(set) = self.sets.get(self.next) {
            if set.at_time > time {
                break;
            }
            for change in &set.changes {
                // Names were checked at parse time
                if let Err(e) = params.set(p, &change.name, change.value) {
                    log::warn!("Skipping experiment change: {}", e);
                }
            }
            log::debug!(
                "Applied {} changes scheduled for t={}",
                set.changes.len(),
                set.at_time
            );
            self.next += 1;
            applied += 1;
        }
        applied
    }

    /// The last declared time, or 0 with no `t=` lines.
    pub fn stop_at(&self) -> f64 {
        self.sets.last().map_or(0.0, |s| s.at_time)
    }

    pub fn has_times(&self) -> bool {
        !self.times.is_empty()
    }

    /// Declared times followed by an `f64::MAX` sentinel.
    pub fn output_times(&self) -> Vec<f64> {
        let mut times = self.times.clone();
        times.push(f64::MAX);
        times
    }

    pub fn output_vars(&self) -> &[String] {
        &self.outputs
    }

    pub fn change_sets(&self) -> &[ChangeSet] {
        &self.sets
    }

    /// Writes the experiment back in its input format, followed by `end-exp`.
    pub fn write_exp<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        write!(out, "o=")?;
        for name in &self.outputs {
            write!(out, " {}", name)?;
        }
        writeln!(out)?;

        let declared_zero = self.times.first() == Some(&0.0);
        for (i, set) in self.sets.iter().enumerate() {
            if i > 0 || declared_zero {
                writeln!(out, "t= {}", set.at_time)?;
            }
            for change in &set.changes {
                writeln!(out, "{} {}", change.name, change.value)?;
            }
        }
        writeln!(out, "end-exp")
    }
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        self.write_exp(&mut buf).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXP: &str = "\
# Salt loading
o= pa cna

t= 0
nid 0.3
t= 10
nid 0.5
aark 2
t= 20
";

    fn parse(text: &str) -> Result<Experiment, ExperimentError> {
        let reg = Registry::<Parameters>::new("parameter");
        Experiment::parse(text.as_bytes(), &reg)
    }

    #[test]
    fn test_parse_sets_and_outputs() {
        let exp = parse(EXP).unwrap();
        assert_eq!(exp.output_vars(), ["pa", "cna"]);
        // Opening set plus three timed sets
        assert_eq!(exp.change_sets().len(), 4);
        assert_eq!(exp.stop_at(), 20.0);
        assert_eq!(exp.output_times(), vec![0.0, 10.0, 20.0, f64::MAX]);
    }

    #[test]
    fn test_update_applies_due_sets_once() {
        let reg = Registry::<Parameters>::new("parameter");
        let mut exp = parse(EXP).unwrap();
        let mut p = Parameters::default();

        assert_eq!(exp.update(15.0, &mut p, &reg), 3);
        assert_eq!(p.nid, 0.5);
        assert_eq!(p.aark, 2.0);

        p.nid = 0.1;
        assert_eq!(exp.update(15.0, &mut p, &reg), 0);
        assert_eq!(p.nid, 0.1);
        assert_eq!(exp.update(20.0, &mut p, &reg), 1);
    }

    #[test]
    fn test_out_of_order_times_are_applied_in_time_order() {
        let reg = Registry::<Parameters>::new("parameter");
        let mut exp = parse("t= 20\nnid 0.4\nt= 10\nnid 0.3\nt= 10\naark 2\n").unwrap();
        let mut p = Parameters::default();

        assert_eq!(exp.stop_at(), 20.0);
        assert_eq!(exp.output_times(), vec![10.0, 10.0, 20.0, f64::MAX]);

        // Opening set plus both sets at t=10
        assert_eq!(exp.update(15.0, &mut p, &reg), 3);
        assert_eq!(p.nid, 0.3);
        assert_eq!(p.aark, 2.0);
        assert_eq!(exp.update(20.0, &mut p, &reg), 1);
        assert_eq!(p.nid, 0.4);
    }

    #[test]
    fn test_end_exp_stops_parsing() {
        let exp = parse("t= 5\nend-exp\nt= 100\nbogus line here\n").unwrap();
        assert_eq!(exp.stop_at(), 5.0);
    }

    #[test]
    fn test_no_times_stops_at_zero() {
        let exp = parse("o= pa\n").unwrap();
        assert_eq!(exp.stop_at(), 0.0);
        assert!(!exp.has_times());
        assert_eq!(exp.output_times(), vec![f64::MAX]);
    }

    #[test]
    fn test_unknown_parameter_is_rejected() {
        let err = parse("t= 0\nnot_a_param 1.0\n").unwrap_err();
        assert!(matches!(err, ExperimentError::UnknownParameter { line: 2, .. }), "{}", err);
    }

    #[test]
    fn test_malformed_lines_are_rejected() {
        assert!(matches!(parse("nid\n"), Err(ExperimentError::Malformed { line: 1, .. })));
        assert!(matches!(parse("nid abc\n"), Err(ExperimentError::Malformed { .. })));
        assert!(matches!(parse("t= soon\n"), Err(ExperimentError::InvalidTime { .. })));
    }

    #[test]
    fn test_write_exp_round_trips() {
        let exp = parse("o= pa\nnid 0.3\nt= 10\naark 2\n").unwrap();
        let text = exp.to_string();
        assert_eq!(text, "o= pa\nnid 0.3\nt= 10\naark 2\nend-exp\n");

        let again = parse(&text).unwrap();
        assert_eq!(again.change_sets(), exp.change_sets());
    }
}
