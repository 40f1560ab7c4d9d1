pub(crate) mod geometry;
pub(crate) mod graph;
pub(crate) mod mask;
pub(crate) mod material;
pub(crate) mod shader;
