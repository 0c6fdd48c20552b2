pub mod accessor;
pub mod class_kinds;
pub mod collection;
pub mod error;
pub mod instance;
pub mod instance_mut;
pub mod outcome;
pub mod registry;
