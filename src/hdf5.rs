//! Read / Write with hdf5
//!
//! All hdf5 access of this crate goes through the `hdf5-interface`
//! workspace member; this module collects what the record layer needs.
pub use hdf5_interface::hdf5::File;
pub use hdf5_interface::{
    dataset_shapes, group_names, read_attr, read_attrs, read_dataset, read_from_hdf5,
    require_group, variable_exists, write_attr, write_attrs, write_dataset, write_to_hdf5,
    AttrMap, AttrValue,
};
