pub(crate) mod opts;
pub(crate) mod user_model;
