pub mod property;
pub mod snapshot;
pub mod target;

pub use property::{Archive, Asset, PropertyMap, PropertyValue};
pub use snapshot::{Manifest, PluginInfo, Resource, Snapshot};
pub use target::{ConfigMap, Target};
