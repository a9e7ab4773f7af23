//! Command implementations

pub mod delete_merged_branch;

pub mod doctor;

pub mod tag;

pub mod version;
