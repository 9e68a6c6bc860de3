pub mod bus;
pub mod video;

use crate::{
    bus::{DEFAULT_LOAD_ADDRESS, MemoryBus, MemoryError},
    video::VideoEncoder,
};

/// The [`Machine`] struct is the container that is responsible for managing the subsystems
/// required to emulate the computer: the memory bus and the video encoder that interprets the
/// video window of its address space. The instruction engine driving reads and writes is external
/// and accesses the subsystems through the references exposed here.
#[derive(Debug)]
pub struct Machine {
    /// [`MemoryBus`] that owns the ROM and RAM backing buffers.
    bus: MemoryBus,
    /// [`VideoEncoder`] that encodes and decodes the video window contents.
    video: VideoEncoder,
}

impl Machine {
    /// Creates a new default [`Machine`].
    pub fn new() -> Self {
        Self::default()
    }
    /// Gets a reference to the [`MemoryBus`] of the machine.
    pub fn bus(&self) -> &MemoryBus {
        &self.bus
    }
    /// Gets a mutable reference to the [`MemoryBus`] of the machine.
    pub fn bus_mut(&mut self) -> &mut MemoryBus {
        &mut self.bus
    }
    /// Gets a reference to the [`VideoEncoder`] of the machine.
    pub fn video(&self) -> &VideoEncoder {
        &self.video
    }
    /// Gets a mutable reference to the [`VideoEncoder`] of the machine.
    pub fn video_mut(&mut self) -> &mut VideoEncoder {
        &mut self.video
    }
    /// Installs a ROM image onto the memory bus.
    pub fn load_rom(&mut self, data: &[u8]) -> Result<(), MemoryError> {
        self.bus.load_rom(data)
    }
    /// Loads a program image into RAM at the default load address and returns the address it was
    /// loaded at.
    pub fn load_program(&mut self, data: &[u8]) -> Result<u16, MemoryError> {
        self.bus.load_program(data, DEFAULT_LOAD_ADDRESS)
    }
    /// Loads a program image into RAM at the given origin address and returns the address it was
    /// loaded at.
    pub fn load_program_at(&mut self, data: &[u8], origin: u16) -> Result<u16, MemoryError> {
        self.bus.load_program(data, origin)
    }
    /// Returns the machine to its power-on state: RAM is zero-filled and the screen is blanked.
    /// Any installed ROM image is kept.
    pub fn reset(&mut self) {
        tracing::debug!("reset machine");

        self.bus.clear_ram();
        self.video.clear_screen(&mut self.bus);
    }
}

impl Default for Machine {
    /// Creates a default [`Machine`] with empty memory and the stock display configuration.
    fn default() -> Self {
        Self {
            bus: MemoryBus::new(),
            video: VideoEncoder::new(),
        }
    }
}
