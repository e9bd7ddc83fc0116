pub(crate) mod def;
pub(crate) mod run;
