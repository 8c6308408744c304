/// Flat EXR writer.
pub mod exr;
/// PNG preview writer.
pub mod png;
/// Merged-deep sink contract and bundled sinks.
pub mod sink;

pub use exr::write_flat_exr;
pub use png::write_png;
pub use sink::{DeepSink, JsonDeepSink, MemoryDeepSink};
