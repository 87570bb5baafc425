//! Department table: the per-department rules the aggregator consults.
//!
//! Every branch that depends on "which department is this" reads a
//! `DepartmentProfile` from here instead of comparing codes inline:
//!   - display unit of pool values (raw hours vs. talent units)
//!   - whether subcontracted company pools count toward capacity
//!   - whether external team pools count toward capacity
//!   - which work stages a project may schedule for the department

use crate::error::{PlanError, PlanResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Department {
    Pm,
    Med,
    Hd,
    Mfg,
    Build,
    Prg,
}

impl Department {
    /// All departments in matrix display order.
    pub const ALL: [Department; 6] = [
        Department::Pm,
        Department::Med,
        Department::Hd,
        Department::Mfg,
        Department::Build,
        Department::Prg,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Pm    => "PM",
            Self::Med   => "MED",
            Self::Hd    => "HD",
            Self::Mfg   => "MFG",
            Self::Build => "BUILD",
            Self::Prg   => "PRG",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pm    => "Project Manager",
            Self::Med   => "Mechanical Design",
            Self::Hd    => "Hardware Design",
            Self::Mfg   => "Manufacturing",
            Self::Build => "Assembly",
            Self::Prg   => "Programming PLC",
        }
    }

    pub fn profile(&self) -> &'static DepartmentProfile {
        match self {
            Self::Pm    => &PM_PROFILE,
            Self::Med   => &MED_PROFILE,
            Self::Hd    => &HD_PROFILE,
            Self::Mfg   => &MFG_PROFILE,
            Self::Build => &BUILD_PROFILE,
            Self::Prg   => &PRG_PROFILE,
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Department {
    type Err = PlanError;

    /// Accepts codes case-insensitively, surrounding whitespace ignored.
    fn from_str(s: &str) -> PlanResult<Self> {
        let code = s.trim().to_ascii_uppercase();
        Department::ALL
            .into_iter()
            .find(|d| d.code() == code)
            .ok_or_else(|| PlanError::UnknownDepartment { code: s.to_string() })
    }
}

/// Static capacity rules for one department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentProfile {
    /// Pool and assignment values are shown as raw hours rather than
    /// normalized to talent units.
    pub uses_raw_hours_display: bool,
    /// Subcontracted company pools add to available capacity.
    pub supports_subcontracting: bool,
    /// External team pools add to available capacity.
    pub supports_external_teams: bool,
    pub valid_stages: &'static [Stage],
}

impl DepartmentProfile {
    pub fn allows_stage(&self, stage: Stage) -> bool {
        self.valid_stages.contains(&stage)
    }

    /// Employees of this department may carry a subcontract company.
    pub fn accepts_subcontract_flag(&self) -> bool {
        self.supports_subcontracting || self.supports_external_teams
    }
}

static PM_PROFILE: DepartmentProfile = DepartmentProfile {
    uses_raw_hours_display:  false,
    supports_subcontracting: false,
    supports_external_teams: false,
    valid_stages:            &[],
};

static MED_PROFILE: DepartmentProfile = DepartmentProfile {
    uses_raw_hours_display:  false,
    supports_subcontracting: false,
    supports_external_teams: false,
    valid_stages: &[
        Stage::Concept,
        Stage::DetailDesign,
        Stage::Release,
        Stage::RedLines,
        Stage::Support,
    ],
};

static HD_PROFILE: DepartmentProfile = DepartmentProfile {
    uses_raw_hours_display:  false,
    supports_subcontracting: false,
    supports_external_teams: false,
    valid_stages: &[
        Stage::SwitchLayoutRevision,
        Stage::ControlsDesign,
        Stage::Release,
        Stage::RedLines,
        Stage::Support,
    ],
};

static MFG_PROFILE: DepartmentProfile = DepartmentProfile {
    uses_raw_hours_display:  true,
    supports_subcontracting: false,
    supports_external_teams: false,
    valid_stages:            &[],
};

static BUILD_PROFILE: DepartmentProfile = DepartmentProfile {
    uses_raw_hours_display:  false,
    supports_subcontracting: true,
    supports_external_teams: false,
    valid_stages: &[
        Stage::CabinetsFrames,
        Stage::OverallAssembly,
        Stage::FineTuning,
        Stage::Commissioning,
        Stage::Support,
    ],
};

static PRG_PROFILE: DepartmentProfile = DepartmentProfile {
    uses_raw_hours_display:  false,
    supports_subcontracting: false,
    supports_external_teams: true,
    valid_stages: &[
        Stage::Offline,
        Stage::Online,
        Stage::Debug,
        Stage::Commissioning,
        Stage::SupportManualsFlowCharts,
        Stage::RobotSimulation,
        Stage::StandardsRevProgramingConcept,
    ],
};

/// Work stages a project schedules per department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    SwitchLayoutRevision,
    ControlsDesign,
    Concept,
    DetailDesign,
    CabinetsFrames,
    OverallAssembly,
    FineTuning,
    Commissioning,
    Offline,
    Online,
    Debug,
    Release,
    RedLines,
    Support,
    SupportManualsFlowCharts,
    RobotSimulation,
    StandardsRevProgramingConcept,
}

impl Stage {
    pub const ALL: [Stage; 17] = [
        Stage::SwitchLayoutRevision,
        Stage::ControlsDesign,
        Stage::Concept,
        Stage::DetailDesign,
        Stage::CabinetsFrames,
        Stage::OverallAssembly,
        Stage::FineTuning,
        Stage::Commissioning,
        Stage::Offline,
        Stage::Online,
        Stage::Debug,
        Stage::Release,
        Stage::RedLines,
        Stage::Support,
        Stage::SupportManualsFlowCharts,
        Stage::RobotSimulation,
        Stage::StandardsRevProgramingConcept,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::SwitchLayoutRevision          => "SWITCH_LAYOUT_REVISION",
            Self::ControlsDesign                => "CONTROLS_DESIGN",
            Self::Concept                       => "CONCEPT",
            Self::DetailDesign                  => "DETAIL_DESIGN",
            Self::CabinetsFrames                => "CABINETS_FRAMES",
            Self::OverallAssembly               => "OVERALL_ASSEMBLY",
            Self::FineTuning                    => "FINE_TUNING",
            Self::Commissioning                 => "COMMISSIONING",
            Self::Offline                       => "OFFLINE",
            Self::Online                        => "ONLINE",
            Self::Debug                         => "DEBUG",
            Self::Release                       => "RELEASE",
            Self::RedLines                      => "RED_LINES",
            Self::Support                       => "SUPPORT",
            Self::SupportManualsFlowCharts      => "SUPPORT_MANUALS_FLOW_CHARTS",
            Self::RobotSimulation               => "ROBOT_SIMULATION",
            Self::StandardsRevProgramingConcept => "STANDARDS_REV_PROGRAMING_CONCEPT",
        }
    }
}

impl FromStr for Stage {
    type Err = PlanError;

    fn from_str(s: &str) -> PlanResult<Self> {
        let code = s.trim().to_ascii_uppercase();
        Stage::ALL
            .into_iter()
            .find(|st| st.code() == code)
            .ok_or_else(|| PlanError::UnknownStage { code: s.to_string() })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Facility {
    Al,
    Mi,
    Mx,
}

impl Facility {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Al => "AL",
            Self::Mi => "MI",
            Self::Mx => "MX",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Al => "Facility A",
            Self::Mi => "Facility B",
            Self::Mx => "Facility C",
        }
    }
}

impl FromStr for Facility {
    type Err = PlanError;

    fn from_str(s: &str) -> PlanResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AL" => Ok(Self::Al),
            "MI" => Ok(Self::Mi),
            "MX" => Ok(Self::Mx),
            _ => Err(PlanError::validation("facility", format!("unknown facility '{s}'"))),
        }
    }
}

/// Subcontract companies the assembly floor has historically used.
/// Company names remain free text; this list only seeds pickers and demo data.
pub const KNOWN_SUBCONTRACT_COMPANIES: [&str; 5] = ["AMI", "VICER", "ITAX", "MCI", "MG Electrical"];
