pub mod analyzer;
pub mod catalog;
pub mod detection;
pub mod extraction;
pub mod model;
pub mod pattern;
pub mod samples;
pub mod scoring;
