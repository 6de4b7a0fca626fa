//! Programm‑Build: Quelltext‑Fragmente → ein Programm + Build‑Log.

#[cfg(feature = "metrics")]
use std::time::Instant;

use crate::{backend::Backend, platform::ActivePlatform, ClError};

/// Standard‑Optionen: OpenCL C 2.0
pub const DEFAULT_BUILD_OPTIONS: &str = "-cl-std=CL2.0";

/// Geräteschlüssel für Meldungen, die nicht von einem Gerät stammen
pub const HOST_DEVICE: &str = "host";

// ─── Build‑Log ────────────────────────────────────────────────────────

/// Diagnose‑Text eines Geräts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceLog {
    pub device: String,
    pub text: String,
}

/// Geräte → Diagnose, in Geräte‑Reihenfolge
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildLog {
    entries: Vec<DeviceLog>,
}

impl BuildLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, device: impl Into<String>, text: impl Into<String>) {
        self.entries.push(DeviceLog {
            device: device.into(),
            text: text.into(),
        });
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeviceLog> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// true, wenn mindestens ein Gerät nicht‑leeren Text geliefert hat
    pub fn has_diagnostics(&self) -> bool {
        self.entries.iter().any(|e| !e.text.trim().is_empty())
    }
}

impl<D: Into<String>, T: Into<String>> FromIterator<(D, T)> for BuildLog {
    fn from_iter<I: IntoIterator<Item = (D, T)>>(iter: I) -> Self {
        let mut log = BuildLog::new();
        for (device, text) in iter {
            log.push(device, text);
        }
        log
    }
}

impl<'a> IntoIterator for &'a BuildLog {
    type Item = &'a DeviceLog;
    type IntoIter = std::slice::Iter<'a, DeviceLog>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Alle Diagnosen hintereinander, jede mit Zeilenumbruch abgeschlossen.
pub fn format_log(log: &BuildLog) -> String {
    let mut out = String::new();
    for entry in log {
        out.push_str(&entry.text);
        out.push('\n');
    }
    out
}

// ─── Build‑Ergebnis ───────────────────────────────────────────────────

/// Erfolg genau dann, wenn ein Programm vorhanden ist.
#[derive(Debug)]
pub enum BuildOutcome<P> {
    Built { program: P, log: BuildLog },
    Failed { log: BuildLog },
}

impl<P> BuildOutcome<P> {
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Built { .. })
    }

    pub fn program(&self) -> Option<&P> {
        match self {
            BuildOutcome::Built { program, .. } => Some(program),
            BuildOutcome::Failed { .. } => None,
        }
    }

    pub fn log(&self) -> &BuildLog {
        match self {
            BuildOutcome::Built { log, .. } | BuildOutcome::Failed { log } => log,
        }
    }

    /// Fehlschlag wird zu `ClError::Build` mit formatiertem Log.
    pub fn into_result(self) -> Result<(P, BuildLog), ClError> {
        match self {
            BuildOutcome::Built { program, log } => Ok((program, log)),
            BuildOutcome::Failed { log } => Err(ClError::Build(format_log(&log))),
        }
    }
}

// ─── Builder ──────────────────────────────────────────────────────────

pub struct ProgramBuilder<'a, B: Backend> {
    backend: &'a B,
    active: &'a ActivePlatform<B>,
    options: String,
}

impl<'a, B: Backend> ProgramBuilder<'a, B> {
    pub fn new(backend: &'a B, active: &'a ActivePlatform<B>) -> Self {
        Self {
            backend,
            active,
            options: DEFAULT_BUILD_OPTIONS.to_owned(),
        }
    }

    pub fn options(mut self, options: impl Into<String>) -> Self {
        self.options = options.into();
        self
    }

    pub fn build_options(&self) -> &str {
        &self.options
    }

    /// Baut alle Fragmente als eine Übersetzungseinheit.
    ///
    /// Wirft nie: Fehler beim Anlegen oder Bauen landen als `Failed` mit Log.
    /// Ein teilweise gebautes Programm wird vor der Rückgabe freigegeben.
    pub fn build(&self, fragments: &[&str]) -> BuildOutcome<B::Program> {
        #[cfg(feature = "metrics")]
        let t = Instant::now();

        let outcome = self.build_inner(fragments);

        #[cfg(feature = "metrics")]
        crate::metrics::record("build", t);

        outcome
    }

    fn build_inner(&self, fragments: &[&str]) -> BuildOutcome<B::Program> {
        let context = self.active.context();

        let mut program = match self.backend.create_program(context, fragments) {
            Ok(program) => program,
            Err(e) => {
                log::warn!("program creation failed: {e}");
                let mut log = BuildLog::new();
                log.push(HOST_DEVICE, format!("program creation failed: {e}"));
                return BuildOutcome::Failed { log };
            }
        };

        let built = self.backend.build_program(context, &mut program, &self.options);

        // Log auch bei Erfolg holen – kann Warnungen enthalten
        let mut log = match self.backend.build_log(context, &program) {
            Ok(log) => log,
            Err(e) => {
                let mut log = BuildLog::new();
                log.push(HOST_DEVICE, format!("build log unavailable: {e}"));
                log
            }
        };

        match built {
            Ok(()) => {
                log::info!(
                    "built {} fragment(s) with {:?}",
                    fragments.len(),
                    self.options
                );
                BuildOutcome::Built { program, log }
            }
            Err(e) => {
                drop(program);
                if !log.has_diagnostics() {
                    log.push(HOST_DEVICE, format!("build failed: {e}"));
                }
                log::warn!("build failed ({e}), {} log entries", log.len());
                BuildOutcome::Failed { log }
            }
        }
    }
}
