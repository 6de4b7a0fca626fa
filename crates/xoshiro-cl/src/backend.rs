//! Schnittstelle zum Compute‑Backend (OpenCL oder Mock).

use std::fmt;

use crate::{program::BuildLog, ClError};

/// Opaker Plattform‑Handle, nur für Identitätsvergleiche
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlatformId(pub usize);

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Abfragbare Attribute einer Plattform. Jede Abfrage kann einzeln fehlschlagen.
pub trait PlatformInfo {
    fn handle(&self) -> PlatformId;
    fn name(&self) -> Result<String, ClError>;
    fn version(&self) -> Result<String, ClError>;
    fn profile(&self) -> Result<String, ClError>;
    fn vendor(&self) -> Result<String, ClError>;
}

/// Compute‑Backend: Plattformen aufzählen, Kontext aktivieren, Programme bauen.
///
/// `Context` und `Program` geben ihre Ressourcen im `Drop` frei.
pub trait Backend {
    type Platform: PlatformInfo + Clone;
    type Context;
    type Program;

    /// Alle Plattformen in Backend‑Reihenfolge
    fn platforms(&self) -> Result<Vec<Self::Platform>, ClError>;

    /// Kontext über alle Geräte der Plattform
    fn create_context(&self, platform: &Self::Platform) -> Result<Self::Context, ClError>;

    /// Plattform, an die der Kontext tatsächlich gebunden ist
    fn context_platform(&self, context: &Self::Context) -> Result<PlatformId, ClError>;

    fn create_program(
        &self,
        context: &Self::Context,
        sources: &[&str],
    ) -> Result<Self::Program, ClError>;

    /// Synchroner Build für alle Geräte des Kontexts
    fn build_program(
        &self,
        context: &Self::Context,
        program: &mut Self::Program,
        options: &str,
    ) -> Result<(), ClError>;

    /// Build‑Log pro Gerät, in Geräte‑Reihenfolge
    fn build_log(&self, context: &Self::Context, program: &Self::Program)
        -> Result<BuildLog, ClError>;
}
