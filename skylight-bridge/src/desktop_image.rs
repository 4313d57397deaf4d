use crate::error::DesktopImageError;
#[cfg(target_os = "macos")]
use crate::cf_dictionary_from_pairs;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;
use strum::Display;
use strum::EnumString;

#[cfg(target_os = "macos")]
use objc2_core_foundation::CFBoolean;
#[cfg(target_os = "macos")]
use objc2_core_foundation::CFDictionary;
#[cfg(target_os = "macos")]
use objc2_core_foundation::CFNumber;
#[cfg(target_os = "macos")]
use objc2_core_foundation::CFRetained;
#[cfg(target_os = "macos")]
use objc2_core_foundation::CFType;
#[cfg(target_os = "macos")]
use objc2_core_foundation::CFURL;

pub const IMAGE_SCALING_KEY: &str = "ImageScaling";
pub const ALLOW_CLIPPING_KEY: &str = "AllowClipping";

pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "heic", "tif", "tiff", "gif", "bmp", "webp",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopImage {
    path: PathBuf,
}

impl DesktopImage {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DesktopImageError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DesktopImageError::NotFound(path.to_path_buf()));
        }

        if !path.is_file() {
            return Err(DesktopImageError::NotAFile(path.to_path_buf()));
        }

        let supported = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| {
                SUPPORTED_EXTENSIONS
                    .iter()
                    .any(|supported| supported.eq_ignore_ascii_case(extension))
            });

        if !supported {
            return Err(DesktopImageError::UnsupportedFormat {
                path: path.to_path_buf(),
                supported: SUPPORTED_EXTENSIONS.join(", "),
            });
        }

        let path = dunce::canonicalize(path)
            .map_err(|_| DesktopImageError::NotFound(path.to_path_buf()))?;

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(target_os = "macos")]
    pub fn url(&self) -> Result<CFRetained<CFURL>, DesktopImageError> {
        CFURL::from_file_path(&self.path)
            .ok_or_else(|| DesktopImageError::InvalidUrl(self.path.clone()))
    }
}

/// Mirrors the NSImageScaling values understood by the window server
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ImageScaling {
    ProportionallyDown,
    AxesIndependently,
    None,
    ProportionallyUpOrDown,
}

impl ImageScaling {
    pub fn raw(self) -> i32 {
        match self {
            ImageScaling::ProportionallyDown => 0,
            ImageScaling::AxesIndependently => 1,
            ImageScaling::None => 2,
            ImageScaling::ProportionallyUpOrDown => 3,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopImageOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaling: Option<ImageScaling>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_clipping: Option<bool>,
}

impl DesktopImageOptions {
    /// Values set on `other` take precedence over values set on `self`
    #[must_use]
    pub fn merge(self, other: DesktopImageOptions) -> Self {
        Self {
            scaling: other.scaling.or(self.scaling),
            allow_clipping: other.allow_clipping.or(self.allow_clipping),
        }
    }

    #[cfg(target_os = "macos")]
    pub fn to_dictionary(&self) -> CFRetained<CFDictionary> {
        let scaling = self.scaling.map(|scaling| CFNumber::new_i32(scaling.raw()));

        let mut pairs: Vec<(&'static str, &CFType)> = vec![];
        if let Some(scaling) = &scaling {
            let scaling: &CFType = scaling;
            pairs.push((IMAGE_SCALING_KEY, scaling));
        }

        if let Some(allow_clipping) = self.allow_clipping {
            let allow_clipping: &CFType = CFBoolean::new(allow_clipping);
            pairs.push((ALLOW_CLIPPING_KEY, allow_clipping));
        }

        cf_dictionary_from_pairs(&pairs)
    }
}
