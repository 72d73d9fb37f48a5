pub(crate) mod family;
pub(crate) mod grid;
pub(crate) mod synth;
pub(crate) mod table;
