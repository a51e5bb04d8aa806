pub mod codecs;
pub mod encoder;
pub mod metadata;
