pub(crate) mod compare;
pub(crate) mod cpu;
pub(crate) mod frame;
pub(crate) mod options;
pub(crate) mod palette;
pub(crate) mod surface;
pub(crate) mod text;
