//! In‑Memory‑Backend ohne OpenCL‑Installation.
//!
//! Plattformen, Geräte und der "Compiler" sind frei konfigurierbar; das
//! [`ProgramLedger`] zählt angelegte und freigegebene Programme.

use std::{cell::Cell, rc::Rc};

use crate::{
    backend::{Backend, PlatformId, PlatformInfo},
    program::BuildLog,
    ClError,
};

/// CL_INVALID_VALUE
const INVALID_VALUE: i32 = -30;
/// CL_BUILD_PROGRAM_FAILURE
const BUILD_PROGRAM_FAILURE: i32 = -11;
/// CL_PLATFORM_NOT_FOUND_KHR
const PLATFORM_NOT_FOUND: i32 = -1001;
/// CL_INVALID_PLATFORM
const INVALID_PLATFORM: i32 = -32;

/// Compiler über den zusammengesetzten Quelltext: Ok(Warnungen) oder Err(Fehler)
pub type Compiler = Box<dyn Fn(&str) -> Result<String, String>>;

// ─── Plattform ────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct MockPlatform {
    id: PlatformId,
    name: String,
    version: Option<String>,
    profile: String,
    vendor: String,
    devices: Vec<String>,
}

impl MockPlatform {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            id: PlatformId(0),
            name: name.to_owned(),
            version: Some(version.to_owned()),
            profile: "FULL_PROFILE".to_owned(),
            vendor: "Mock Vendor".to_owned(),
            devices: vec![format!("{name} device 0")],
        }
    }

    pub fn with_vendor(mut self, vendor: &str) -> Self {
        self.vendor = vendor.to_owned();
        self
    }

    pub fn with_profile(mut self, profile: &str) -> Self {
        self.profile = profile.to_owned();
        self
    }

    pub fn with_devices(mut self, devices: &[&str]) -> Self {
        self.devices = devices.iter().map(|d| (*d).to_owned()).collect();
        self
    }

    /// Versions‑Abfrage schlägt fehl
    pub fn unreadable_version(mut self) -> Self {
        self.version = None;
        self
    }
}

impl PlatformInfo for MockPlatform {
    fn handle(&self) -> PlatformId {
        self.id
    }

    fn name(&self) -> Result<String, ClError> {
        Ok(self.name.clone())
    }

    fn version(&self) -> Result<String, ClError> {
        self.version.clone().ok_or(ClError::Api(INVALID_PLATFORM))
    }

    fn profile(&self) -> Result<String, ClError> {
        Ok(self.profile.clone())
    }

    fn vendor(&self) -> Result<String, ClError> {
        Ok(self.vendor.clone())
    }
}

// ─── Ledger ───────────────────────────────────────────────────────────

/// Zählt Programm‑Objekte; `live() == 0` heißt: nichts geleakt.
#[derive(Debug, Default)]
pub struct ProgramLedger {
    created: Cell<usize>,
    released: Cell<usize>,
}

impl ProgramLedger {
    pub fn created(&self) -> usize {
        self.created.get()
    }

    pub fn released(&self) -> usize {
        self.released.get()
    }

    pub fn live(&self) -> usize {
        self.created.get() - self.released.get()
    }
}

// ─── Kontext & Programm ───────────────────────────────────────────────

#[derive(Debug)]
pub struct MockContext {
    platform: PlatformId,
    devices: Vec<String>,
}

impl MockContext {
    pub fn devices(&self) -> &[String] {
        &self.devices
    }
}

#[derive(Debug)]
pub struct MockProgram {
    source: String,
    options: String,
    log: Option<String>,
    built: bool,
    ledger: Rc<ProgramLedger>,
}

impl MockProgram {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Optionen des letzten Builds
    pub fn options(&self) -> &str {
        &self.options
    }

    pub fn is_built(&self) -> bool {
        self.built
    }
}

impl Drop for MockProgram {
    fn drop(&mut self) {
        let ledger = &self.ledger;
        ledger.released.set(ledger.released.get() + 1);
    }
}

// ─── Backend ──────────────────────────────────────────────────────────

pub struct MockBackend {
    platforms: Vec<MockPlatform>,
    enumeration_fails: bool,
    misroute_to: Option<PlatformId>,
    compiler: Compiler,
    ledger: Rc<ProgramLedger>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            platforms: Vec::new(),
            enumeration_fails: false,
            misroute_to: None,
            compiler: Box::new(default_compiler),
            ledger: Rc::default(),
        }
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hängt eine Plattform an; Handles werden fortlaufend ab 1 vergeben.
    pub fn with_platform(mut self, mut platform: MockPlatform) -> Self {
        platform.id = PlatformId(self.platforms.len() + 1);
        self.platforms.push(platform);
        self
    }

    /// Aufzählung der Plattformen schlägt fehl
    pub fn failing_enumeration(mut self) -> Self {
        self.enumeration_fails = true;
        self
    }

    /// Kontexte melden eine andere Plattform zurück
    pub fn misroute_activation(mut self, to: PlatformId) -> Self {
        self.misroute_to = Some(to);
        self
    }

    pub fn with_compiler(
        mut self,
        compiler: impl Fn(&str) -> Result<String, String> + 'static,
    ) -> Self {
        self.compiler = Box::new(compiler);
        self
    }

    pub fn ledger(&self) -> Rc<ProgramLedger> {
        Rc::clone(&self.ledger)
    }
}

/// Standard‑Compiler: jede Zeile mit `#error` ist ein Fehler.
pub fn default_compiler(source: &str) -> Result<String, String> {
    let errors: Vec<String> = source
        .lines()
        .filter_map(|line| line.trim().strip_prefix("#error"))
        .map(|msg| format!("error: {}", msg.trim()))
        .collect();
    if errors.is_empty() {
        Ok(String::new())
    } else {
        Err(errors.join("\n"))
    }
}

impl Backend for MockBackend {
    type Platform = MockPlatform;
    type Context = MockContext;
    type Program = MockProgram;

    fn platforms(&self) -> Result<Vec<MockPlatform>, ClError> {
        if self.enumeration_fails {
            return Err(ClError::Api(PLATFORM_NOT_FOUND));
        }
        Ok(self.platforms.clone())
    }

    fn create_context(&self, platform: &MockPlatform) -> Result<MockContext, ClError> {
        if platform.devices.is_empty() {
            return Err(ClError::NoDevices);
        }
        Ok(MockContext {
            platform: platform.id,
            devices: platform.devices.clone(),
        })
    }

    fn context_platform(&self, context: &MockContext) -> Result<PlatformId, ClError> {
        Ok(self.misroute_to.unwrap_or(context.platform))
    }

    fn create_program(
        &self,
        _context: &MockContext,
        sources: &[&str],
    ) -> Result<MockProgram, ClError> {
        if sources.is_empty() {
            return Err(ClError::Api(INVALID_VALUE));
        }
        let ledger = &self.ledger;
        ledger.created.set(ledger.created.get() + 1);
        Ok(MockProgram {
            source: sources.concat(),
            options: String::new(),
            log: None,
            built: false,
            ledger: Rc::clone(ledger),
        })
    }

    fn build_program(
        &self,
        _context: &MockContext,
        program: &mut MockProgram,
        options: &str,
    ) -> Result<(), ClError> {
        program.options = options.to_owned();
        match (self.compiler)(&program.source) {
            Ok(log) => {
                program.log = Some(log);
                program.built = true;
                Ok(())
            }
            Err(log) => {
                program.log = Some(log);
                Err(ClError::Api(BUILD_PROGRAM_FAILURE))
            }
        }
    }

    fn build_log(&self, context: &MockContext, program: &MockProgram) -> Result<BuildLog, ClError> {
        let text = program.log.as_deref().unwrap_or_default();
        Ok(context.devices.iter().map(|d| (d.as_str(), text)).collect())
    }
}
