pub(crate) mod composite;
pub(crate) mod marker;
pub(crate) mod pattern;
pub(crate) mod vector;
