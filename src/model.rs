pub(crate) mod external;
pub(crate) mod memory;
pub(crate) mod runtime;
pub(crate) mod value;
