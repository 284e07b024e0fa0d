pub mod difference;
pub mod feature;
pub mod feature_kind;
pub mod identity;
pub mod image_shape;
pub mod offset;
pub mod sample_matrix;
pub mod scale_invariant;
