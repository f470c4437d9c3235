pub mod entity;
pub mod mapping;

pub use entity::{NormalizedEntity, SourceTag};
pub use mapping::{EntityMapping, MappingReport, SourceSummary, UnmappedEntity};
