pub(crate) mod failure;
pub(crate) mod pipeline;
pub(crate) mod quality;
pub(crate) mod schema;
pub(crate) mod syntax;
