pub mod builder;
pub mod cpu;
pub mod decoder;
pub mod disasm;
pub mod emitter;
pub mod encoder;
pub mod error;
pub mod exec;
pub mod host;
pub mod isa;
pub mod memory;
pub mod operand;
pub mod programs;

pub use builder::ProgramBuilder;
pub use cpu::{Cpu, CpuConfig, RunOutcome, Trap};
pub use emitter::{Emitter, ListingEntry, ProgramBuffer};
pub use encoder::Instr;
pub use error::{AsmError, OperandError};
pub use host::{BufferHost, Host, StdHost};
pub use isa::Mnemonic;
pub use memory::{Bus, LinearMemory};
pub use operand::{Mem, Reg};
