// mod.rs - Storage module exports

mod component_storage;
mod view;

pub use component_storage::{ComponentOwner, ComponentStorage};
pub use view::{ComponentView, ComponentViewMut, DynIter, DynIterMut, DynView, DynViewMut};
