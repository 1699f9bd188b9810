use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Pi estimation strategy that produced a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Program {
    #[serde(rename = "01_pi_serial")]
    Serial,
    #[serde(rename = "02_pi_parallel_race")]
    Race,
    #[serde(rename = "03_pi_parallel_busy")]
    BusyWait,
    #[serde(rename = "04_pi_parallel_busy_cs")]
    BusyWaitCs,
    #[serde(rename = "05_pi_parallel_mutex")]
    Mutex,
}

impl Program {
    pub const ALL: [Program; 5] = [
        Program::Serial,
        Program::Race,
        Program::BusyWait,
        Program::BusyWaitCs,
        Program::Mutex,
    ];

    /// Reference program for speedup calculations
    pub const BASELINE: Program = Program::Serial;

    /// Identifier used in the results table
    pub fn id(self) -> &'static str {
        match self {
            Program::Serial => "01_pi_serial",
            Program::Race => "02_pi_parallel_race",
            Program::BusyWait => "03_pi_parallel_busy",
            Program::BusyWaitCs => "04_pi_parallel_busy_cs",
            Program::Mutex => "05_pi_parallel_mutex",
        }
    }

    /// Short lowercase name for plain text output
    pub fn short_name(self) -> &'static str {
        match self {
            Program::Serial => "serial",
            Program::Race => "race",
            Program::BusyWait => "busy-wait",
            Program::BusyWaitCs => "busy-wait-cs",
            Program::Mutex => "mutex",
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProgram(pub String);

impl fmt::Display for UnknownProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown program identifier {:?}", self.0)
    }
}

impl std::error::Error for UnknownProgram {}

impl FromStr for Program {
    type Err = UnknownProgram;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Program::ALL
            .into_iter()
            .find(|p| p.id() == s || p.short_name() == s)
            .ok_or_else(|| UnknownProgram(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ids_and_short_names() {
        for program in Program::ALL {
            assert_eq!(program.id().parse::<Program>(), Ok(program));
            assert_eq!(program.short_name().parse::<Program>(), Ok(program));
            assert_eq!(program.to_string(), program.id());
        }
        assert!("06_pi_openmp".parse::<Program>().is_err());
    }
}
