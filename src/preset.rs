//! Built-in tree presets.

use clap::ValueEnum;
use sproutfile_core::{Manifest, ManifestError, ManifestFormat};

const EXAM_SCHEDULE: &str = include_str!("../presets/exam-schedule.toml");

/// Trees shipped with the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Spring Boot + React exam scheduler with Docker, monitoring and k8s manifests
    ExamSchedule,
}

impl Preset {
    fn source(self) -> &'static str {
        match self {
            Self::ExamSchedule => EXAM_SCHEDULE,
        }
    }

    /// Parse the preset into a manifest.
    pub fn manifest(self) -> Result<Manifest, ManifestError> {
        Manifest::parse(self.source(), ManifestFormat::Toml)
    }
}
