#![warn(clippy::all)]

use crate::error::DescriptorError;
use crate::error::DesktopImageError;
use crate::error::SkyLightError;
use lazy_static::lazy_static;
use std::path::PathBuf;

#[cfg(target_os = "macos")]
use objc2_core_foundation::CFArray;
#[cfg(target_os = "macos")]
use objc2_core_foundation::CFDictionary;
#[cfg(target_os = "macos")]
use objc2_core_foundation::CFRetained;
#[cfg(target_os = "macos")]
use objc2_core_foundation::CFString;
#[cfg(target_os = "macos")]
use objc2_core_foundation::CFType;
#[cfg(target_os = "macos")]
use std::ptr::NonNull;

pub mod config;
pub mod desktop_image;
pub mod error;
pub mod pathext;
pub mod space;

#[cfg(target_os = "macos")]
pub mod skylight;
#[cfg(target_os = "macos")]
pub mod window_server;

pub use pathext::PathExt;
pub use pathext::replace_env_in_path;

/// Handle identifying a client session with the window server
pub type ConnectionId = u32;
/// The `id64` of a space
pub type SpaceId = i64;

lazy_static! {
    pub static ref CONFIG_HOME: PathBuf = {
        std::env::var("SKYLIGHT_CONFIG_HOME").map_or_else(
            |_| {
                dirs::home_dir()
                    .expect("there is no home directory")
                    .join(".config")
                    .join("skylight")
            },
            |home_path| {
                let home = home_path.replace_env();

                assert!(
                    home.is_dir(),
                    "$SKYLIGHT_CONFIG_HOME is set to '{home_path}', which is not a valid directory"
                );

                home
            },
        )
    };
}

#[cfg(target_os = "macos")]
pub fn cf_array_as<T>(array: &CFArray) -> impl Iterator<Item = NonNull<T>> + use<'_, T> {
    let count = CFArray::count(array);
    (0..count).flat_map(move |idx| {
        NonNull::new(unsafe { CFArray::value_at_index(array, idx).cast_mut() })
            .map(|ptr| ptr.cast::<T>())
    })
}

#[cfg(target_os = "macos")]
pub fn cf_dictionary_value<T>(dict: &CFDictionary, key: &CFString) -> Option<NonNull<T>> {
    let ptr = unsafe { CFDictionary::value(dict, NonNull::from(key).as_ptr().cast()) };
    NonNull::new(ptr.cast_mut()).map(|ptr| ptr.cast::<T>())
}

/// Builds an untyped dictionary with CFString keys, retaining every value
#[cfg(target_os = "macos")]
pub fn cf_dictionary_from_pairs(pairs: &[(&'static str, &CFType)]) -> CFRetained<CFDictionary> {
    let keys = pairs
        .iter()
        .map(|(key, _)| CFString::from_static_str(key))
        .collect::<Vec<_>>();
    let keys = keys.iter().map(|key| &**key).collect::<Vec<&CFString>>();
    let values = pairs.iter().map(|(_, value)| *value).collect::<Vec<&CFType>>();

    let dictionary = CFDictionary::<CFString, CFType>::from_slices(&keys, &values);
    unsafe { CFRetained::cast_unchecked(dictionary) }
}

#[derive(thiserror::Error, Debug)]
pub enum LibraryError {
    #[error(transparent)]
    SkyLight(#[from] SkyLightError),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error(transparent)]
    DesktopImage(#[from] DesktopImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("the window server returned no managed display spaces for connection {0}")]
    NoDisplaySpaces(ConnectionId),
    #[error("no space matches '{0}'")]
    SpaceNotFound(String),
}
