pub mod chroma;
pub mod decode;
pub mod resample;
pub mod smoothing;
pub mod spectrum;
