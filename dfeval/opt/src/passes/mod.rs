//! Passes that derive new graphs from a dataflow graph, or annotate it.
mod normalize;
mod sdf_transformer;
mod srsdf_transformer;

pub use normalize::{normalize, normalized_rates};
pub use sdf_transformer::SdfTransformer;
pub use srsdf_transformer::SrSdfTransformer;
