//! Native object bridging
//!
//! A bridge type wraps one native object and exposes it to scripts. Member
//! lookups go through a fixed order:
//!
//! 1. no wrapped object: not found
//! 2. name declared in the type's [`OverrideTable`]: the override answers
//! 3. otherwise the lazily built [`ReflectiveAdapter`] resolves it
//!
//! The override table is computed once per bridge type and shared by all
//! instances. The adapter is built at most once per instance.

mod adapter;
mod native_bridge;
mod overrides;

pub use adapter::ReflectiveAdapter;
pub use native_bridge::NativeBridge;
pub use overrides::{Override, OverrideMethod, OverrideProperty, OverrideTable, OverrideTableBuilder};

use hostbridge_sdk::{NativeClass, NativeRef};

/// A type that wraps a native object for script access.
pub trait BridgeType: Send + Sync + Sized + 'static {
    /// Script-visible class name
    const CLASS_NAME: &'static str;

    /// The native object this bridge exposes, if any
    fn wrapped_object(&self) -> Option<NativeRef>;

    /// Static type whose declared members the adapter exposes.
    ///
    /// Read once when the bridge instance is created.
    fn static_type(&self) -> NativeClass;

    /// Members this type answers itself instead of delegating.
    ///
    /// Called once per type; see [`OverrideTable::shared`].
    fn overrides() -> OverrideTable<Self> {
        OverrideTable::builder().build()
    }
}
