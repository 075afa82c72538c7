pub mod session;

pub use session::{MemoryKey, SessionMemory};
