pub mod hf;

pub use hf::HfToxicityClassifier;
