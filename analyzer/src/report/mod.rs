pub mod emitter;
pub mod row;

pub use emitter::ReportEmitter;
