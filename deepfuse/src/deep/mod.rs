/// Whole-image grid of deep pixels, for tests, generators and statistics.
pub mod image;
/// Contiguous interleaved scanline buffer shared with layer readers.
pub mod row;
/// Deep samples and depth-sorted pixels.
pub mod sample;
