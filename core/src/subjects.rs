//! Static registry of PPL exam subjects.
//!
//! Titles are in Serbian, matching the question banks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of the synthetic "all recorded errors" review subject.
pub const ERRORS_SUBJECT_ID: &str = "__errors__";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown subject id: {0:?}")]
pub struct UnknownSubject(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SubjectId {
    #[serde(rename = "01-vazduhoplovni-propisi")]
    AirLaw,
    #[serde(rename = "02-opste-poznavanje-vazduhoplova")]
    AircraftGeneralKnowledge,
    #[serde(rename = "03-performanse")]
    Performance,
    #[serde(rename = "04-ljudske-mogucnosti")]
    HumanPerformance,
    #[serde(rename = "05-meteorologija")]
    Meteorology,
    #[serde(rename = "06-navigacija")]
    Navigation,
    #[serde(rename = "07-operativne-procedure")]
    OperationalProcedures,
    #[serde(rename = "08-teorija-letenja")]
    PrinciplesOfFlight,
    #[serde(rename = "09-komunikacije")]
    Communications,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subject {
    pub id: SubjectId,
    pub title: &'static str,
}

pub const SUBJECTS: [Subject; 9] = [
    Subject { id: SubjectId::AirLaw, title: "Vazduhoplovni propisi" },
    Subject { id: SubjectId::AircraftGeneralKnowledge, title: "Opšte poznavanje vazduhoplova" },
    Subject { id: SubjectId::Performance, title: "Performanse i planiranje" },
    Subject { id: SubjectId::HumanPerformance, title: "Ljudske mogućnosti" },
    Subject { id: SubjectId::Meteorology, title: "Meteorologija" },
    Subject { id: SubjectId::Navigation, title: "Navigacija" },
    Subject { id: SubjectId::OperationalProcedures, title: "Operativne procedure" },
    Subject { id: SubjectId::PrinciplesOfFlight, title: "Teorija letenja" },
    Subject { id: SubjectId::Communications, title: "Komunikacije" },
];

impl SubjectId {
    pub const ALL: [SubjectId; 9] = [
        SubjectId::AirLaw,
        SubjectId::AircraftGeneralKnowledge,
        SubjectId::Performance,
        SubjectId::HumanPerformance,
        SubjectId::Meteorology,
        SubjectId::Navigation,
        SubjectId::OperationalProcedures,
        SubjectId::PrinciplesOfFlight,
        SubjectId::Communications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectId::AirLaw => "01-vazduhoplovni-propisi",
            SubjectId::AircraftGeneralKnowledge => "02-opste-poznavanje-vazduhoplova",
            SubjectId::Performance => "03-performanse",
            SubjectId::HumanPerformance => "04-ljudske-mogucnosti",
            SubjectId::Meteorology => "05-meteorologija",
            SubjectId::Navigation => "06-navigacija",
            SubjectId::OperationalProcedures => "07-operativne-procedure",
            SubjectId::PrinciplesOfFlight => "08-teorija-letenja",
            SubjectId::Communications => "09-komunikacije",
        }
    }

    pub fn title(&self) -> &'static str {
        subject(*self).title
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubjectId {
    type Err = UnknownSubject;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubjectId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownSubject(s.to_string()))
    }
}

/// Looks up the registry entry for `id`.
pub fn subject(id: SubjectId) -> &'static Subject {
    // SUBJECTS is declared in the same order as SubjectId::ALL.
    &SUBJECTS[id as usize]
}

pub fn all() -> &'static [Subject] {
    &SUBJECTS
}

/// What a study session draws questions from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudySource {
    Subject(SubjectId),
    /// Every recorded wrong answer, across subjects.
    AllErrors,
}

impl StudySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudySource::Subject(id) => id.as_str(),
            StudySource::AllErrors => ERRORS_SUBJECT_ID,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            StudySource::Subject(id) => id.title(),
            StudySource::AllErrors => "Greške",
        }
    }
}

impl FromStr for StudySource {
    type Err = UnknownSubject;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ERRORS_SUBJECT_ID {
            return Ok(StudySource::AllErrors);
        }
        s.parse().map(StudySource::Subject)
    }
}

impl fmt::Display for StudySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
