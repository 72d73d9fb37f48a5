pub(crate) mod allocator;
pub(crate) mod migrate;
pub(crate) mod preference;
pub(crate) mod registry;
