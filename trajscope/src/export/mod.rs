pub(crate) mod cancel;
pub(crate) mod controller;
pub(crate) mod normalize;
pub(crate) mod output;
pub(crate) mod parallel;
pub(crate) mod progress;
pub(crate) mod result;
