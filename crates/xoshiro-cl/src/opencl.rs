//! Backend über das `opencl3`‑Crate.

use std::ptr;

use opencl3::{
    context::Context,
    device::{Device, CL_DEVICE_TYPE_ALL},
    platform::{get_platforms, Platform},
    program::Program,
};

use crate::{
    backend::{Backend, PlatformId, PlatformInfo},
    program::BuildLog,
    ClError,
};

impl PlatformInfo for Platform {
    #[inline]
    fn handle(&self) -> PlatformId {
        PlatformId(Platform::id(self) as usize)
    }

    fn name(&self) -> Result<String, ClError> {
        Ok(Platform::name(self)?)
    }

    fn version(&self) -> Result<String, ClError> {
        Ok(Platform::version(self)?)
    }

    fn profile(&self) -> Result<String, ClError> {
        Ok(Platform::profile(self)?)
    }

    fn vendor(&self) -> Result<String, ClError> {
        Ok(Platform::vendor(self)?)
    }
}

/// Das echte OpenCL‑ICD hinter `opencl3`
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenClBackend;

impl OpenClBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Backend for OpenClBackend {
    type Platform = Platform;
    type Context = Context;
    type Program = Program;

    fn platforms(&self) -> Result<Vec<Platform>, ClError> {
        Ok(get_platforms()?)
    }

    fn create_context(&self, platform: &Platform) -> Result<Context, ClError> {
        let device_ids = platform.get_devices(CL_DEVICE_TYPE_ALL)?;
        if device_ids.is_empty() {
            return Err(ClError::NoDevices);
        }
        Ok(Context::from_devices(&device_ids, &[], None, ptr::null_mut())?)
    }

    fn context_platform(&self, context: &Context) -> Result<PlatformId, ClError> {
        let device_id = *context.devices().first().ok_or(ClError::NoDevices)?;
        let platform_id = Device::new(device_id).platform()?;
        Ok(PlatformId(platform_id as usize))
    }

    fn create_program(&self, context: &Context, sources: &[&str]) -> Result<Program, ClError> {
        Ok(Program::create_from_sources(context, sources)?)
    }

    fn build_program(
        &self,
        context: &Context,
        program: &mut Program,
        options: &str,
    ) -> Result<(), ClError> {
        program.build(context.devices(), options)?;
        Ok(())
    }

    fn build_log(&self, context: &Context, program: &Program) -> Result<BuildLog, ClError> {
        let mut log = BuildLog::new();
        for &device_id in context.devices() {
            // Gerätename als Schlüssel, sonst die rohe ID
            let device = Device::new(device_id)
                .name()
                .unwrap_or_else(|_| format!("{device_id:?}"));
            log.push(device, program.get_build_log(device_id)?);
        }
        Ok(log)
    }
}
