pub mod analysis;
pub mod boundary;
pub mod commons;
pub mod dataset;
pub mod drawing_tool;
pub mod geo_core;
pub mod process;
pub mod report;

pub use analysis::{analyze, AnalysisError, Plan, Simulation};
pub use dataset::{Dataset, FloraEntry, ProjectionFactors, Region};
pub use geo_core::{Boundary, BoundingBox};
