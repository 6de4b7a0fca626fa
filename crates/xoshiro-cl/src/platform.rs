//! Plattform‑Suche und ‑Aktivierung.

#[cfg(feature = "metrics")]
use std::time::Instant;

use crate::{
    backend::{Backend, PlatformInfo},
    ClError,
};

/// Präfix des Versions‑Strings, z. B. "OpenCL 2.1 AMD-APP"
pub const BACKEND_PREFIX: &str = "OpenCL";

/// Reiner Substring‑Test auf "OpenCL 2." oder "OpenCL 3.".
///
/// Keine Versions‑Analyse: taucht das Muster irgendwo im String auf, passt es.
pub fn is_compatible_version(version: &str) -> bool {
    ["2.", "3."]
        .iter()
        .any(|major| version.contains(&format!("{BACKEND_PREFIX} {major}")))
}

/// Alle Plattformen mit OpenCL 2.x/3.x, in Backend‑Reihenfolge.
///
/// Schlägt nie fehl: Fehler bei der Aufzählung ergeben eine leere Liste,
/// Plattformen mit unlesbarer Version werden übersprungen.
pub fn find_compatible_platforms<B: Backend>(backend: &B) -> Vec<B::Platform> {
    #[cfg(feature = "metrics")]
    let t = Instant::now();

    let platforms = match backend.platforms() {
        Ok(platforms) => platforms,
        Err(e) => {
            log::debug!("platform enumeration failed: {e}");
            Vec::new()
        }
    };
    let total = platforms.len();

    let candidates: Vec<_> = platforms
        .into_iter()
        .filter(|p| match p.version() {
            Ok(version) => {
                let keep = is_compatible_version(&version);
                log::debug!("platform {} version {version:?} -> {keep}", p.handle());
                keep
            }
            Err(e) => {
                log::debug!("platform {} version query failed: {e}", p.handle());
                false
            }
        })
        .collect();

    log::info!("{} of {total} platform(s) are compatible", candidates.len());

    #[cfg(feature = "metrics")]
    crate::metrics::record("find_platforms", t);

    candidates
}

// ─── Aktive Plattform ─────────────────────────────────────────────────

/// Gewählte Plattform samt Kontext; gibt beides im Drop frei.
pub struct ActivePlatform<B: Backend> {
    platform: B::Platform,
    context: B::Context,
}

impl<B: Backend> ActivePlatform<B> {
    pub fn platform(&self) -> &B::Platform {
        &self.platform
    }

    pub fn context(&self) -> &B::Context {
        &self.context
    }
}

/// Nimmt den ersten Kandidaten und aktiviert ihn als Kontext.
///
/// Die Aktivierung gilt nur, wenn der Kontext dieselbe Plattform zurückmeldet.
pub fn activate_first<B: Backend>(
    backend: &B,
    candidates: Vec<B::Platform>,
) -> Result<ActivePlatform<B>, ClError> {
    let platform = candidates
        .into_iter()
        .next()
        .ok_or(ClError::NoCompatiblePlatform)?;

    let context = backend.create_context(&platform)?;
    let requested = platform.handle();
    let reported = backend.context_platform(&context)?;
    if reported != requested {
        return Err(ClError::PlatformActivation {
            requested,
            reported,
        });
    }

    log::info!("activated platform {requested}");
    Ok(ActivePlatform { platform, context })
}

// ─── Beschreibung ─────────────────────────────────────────────────────

/// "name version profile vendor"; fehlgeschlagene Abfragen als `<unknown>`.
pub fn describe_platform<P: PlatformInfo>(platform: &P) -> String {
    let field = |r: Result<String, ClError>| r.unwrap_or_else(|_| "<unknown>".to_owned());
    format!(
        "{} {} {} {}",
        field(platform.name()),
        field(platform.version()),
        field(platform.profile()),
        field(platform.vendor()),
    )
}

/// Eine Zeile pro Plattform
pub fn describe_platforms<P: PlatformInfo>(platforms: &[P]) -> String {
    platforms
        .iter()
        .map(|p| describe_platform(p) + "\n")
        .collect()
}
