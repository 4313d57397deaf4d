use crate::LibraryError;
use crate::SpaceId;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

#[cfg(target_os = "macos")]
use crate::cf_array_as;
#[cfg(target_os = "macos")]
use crate::cf_dictionary_value;
#[cfg(target_os = "macos")]
use crate::error::DescriptorError;
#[cfg(target_os = "macos")]
use objc2_core_foundation::CFArray;
#[cfg(target_os = "macos")]
use objc2_core_foundation::CFDictionary;
#[cfg(target_os = "macos")]
use objc2_core_foundation::CFNumber;
#[cfg(target_os = "macos")]
use objc2_core_foundation::CFString;
#[cfg(target_os = "macos")]
use objc2_core_foundation::CFType;
#[cfg(target_os = "macos")]
use objc2_core_foundation::ConcreteType;

pub const DISPLAY_IDENTIFIER_KEY: &str = "Display Identifier";
pub const CURRENT_SPACE_KEY: &str = "Current Space";
pub const SPACES_KEY: &str = "Spaces";
pub const ID64_KEY: &str = "id64";
pub const MANAGED_SPACE_ID_KEY: &str = "ManagedSpaceID";
pub const UUID_KEY: &str = "uuid";
pub const TYPE_KEY: &str = "type";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum SpaceKind {
    /// A regular desktop created in Mission Control
    User,
    /// A system-owned space such as the legacy Dashboard
    System,
    /// A space holding a single fullscreen application
    Fullscreen,
    Unknown(i64),
}

impl From<i64> for SpaceKind {
    fn from(value: i64) -> Self {
        match value {
            0 => Self::User,
            2 => Self::System,
            4 => Self::Fullscreen,
            other => Self::Unknown(other),
        }
    }
}

impl From<SpaceKind> for i64 {
    fn from(value: SpaceKind) -> Self {
        match value {
            SpaceKind::User => 0,
            SpaceKind::System => 2,
            SpaceKind::Fullscreen => 4,
            SpaceKind::Unknown(other) => other,
        }
    }
}

impl Display for SpaceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SpaceKind::User => write!(f, "desktop"),
            SpaceKind::System => write!(f, "system"),
            SpaceKind::Fullscreen => write!(f, "fullscreen"),
            SpaceKind::Unknown(kind) => write!(f, "unknown ({kind})"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    #[serde(rename = "id64")]
    pub id: SpaceId,
    #[serde(rename = "ManagedSpaceID")]
    pub managed_space_id: SpaceId,
    /// The primary desktop of a display reports an empty uuid
    #[serde(default)]
    pub uuid: String,
    #[serde(rename = "type", default = "default_space_kind")]
    pub kind: SpaceKind,
}

fn default_space_kind() -> SpaceKind {
    SpaceKind::User
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedDisplay {
    /// Either "Main" or the display uuid, depending on the "Displays have separate Spaces" setting
    #[serde(rename = "Display Identifier")]
    pub identifier: String,
    #[serde(
        rename = "Current Space",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub current_space: Option<Space>,
    #[serde(rename = "Spaces", default)]
    pub spaces: Vec<Space>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplaySpaces(pub Vec<ManagedDisplay>);

impl DisplaySpaces {
    pub fn from_value(value: serde_json::Value) -> Result<Self, LibraryError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn displays(&self) -> &[ManagedDisplay] {
        &self.0
    }

    pub fn display(&self, identifier: &str) -> Option<&ManagedDisplay> {
        self.0.iter().find(|display| display.identifier == identifier)
    }

    pub fn spaces(&self) -> impl Iterator<Item = (&ManagedDisplay, &Space)> {
        self.0
            .iter()
            .flat_map(|display| display.spaces.iter().map(move |space| (display, space)))
    }

    pub fn current_spaces(&self) -> impl Iterator<Item = (&ManagedDisplay, &Space)> {
        self.0.iter().filter_map(|display| {
            display
                .current_space
                .as_ref()
                .map(|space| (display, space))
        })
    }

    pub fn desktops(&self) -> impl Iterator<Item = (&ManagedDisplay, &Space)> {
        self.spaces()
            .filter(|(_, space)| space.kind == SpaceKind::User)
    }

    pub fn find(&self, selector: &SpaceSelector) -> Option<(&ManagedDisplay, &Space)> {
        match selector {
            SpaceSelector::Current => self.0.first().and_then(|display| {
                display
                    .current_space
                    .as_ref()
                    .map(|space| (display, space))
            }),
            SpaceSelector::Id(id) => self.spaces().find(|(_, space)| space.id == *id),
            SpaceSelector::Uuid(uuid) => self
                .spaces()
                .find(|(_, space)| !space.uuid.is_empty() && space.uuid.eq_ignore_ascii_case(uuid)),
        }
    }
}

impl FromStr for DisplaySpaces {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SpaceSelector {
    /// The current space of the first display reported by the window server
    #[default]
    Current,
    Id(SpaceId),
    Uuid(String),
}

impl FromStr for SpaceSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("current") {
            Ok(Self::Current)
        } else if let Ok(id) = s.parse::<SpaceId>() {
            Ok(Self::Id(id))
        } else {
            Ok(Self::Uuid(s.to_string()))
        }
    }
}

impl Display for SpaceSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SpaceSelector::Current => write!(f, "current"),
            SpaceSelector::Id(id) => write!(f, "{id}"),
            SpaceSelector::Uuid(uuid) => write!(f, "{uuid}"),
        }
    }
}

#[cfg(target_os = "macos")]
fn optional_value<'a, T: ConcreteType>(
    dict: &'a CFDictionary,
    key: &'static str,
    expected: &'static str,
) -> Result<Option<&'a T>, DescriptorError> {
    let Some(value) = cf_dictionary_value::<CFType>(dict, &CFString::from_static_str(key)) else {
        return Ok(None);
    };

    unsafe { value.as_ref() }
        .downcast_ref::<T>()
        .map(Some)
        .ok_or(DescriptorError::WrongType { key, expected })
}

#[cfg(target_os = "macos")]
fn required_value<'a, T: ConcreteType>(
    dict: &'a CFDictionary,
    key: &'static str,
    expected: &'static str,
) -> Result<&'a T, DescriptorError> {
    optional_value(dict, key, expected)?.ok_or(DescriptorError::MissingKey(key))
}

#[cfg(target_os = "macos")]
fn required_i64(dict: &CFDictionary, key: &'static str) -> Result<i64, DescriptorError> {
    required_value::<CFNumber>(dict, key, "an integer")?
        .as_i64()
        .ok_or(DescriptorError::WrongType {
            key,
            expected: "an integer",
        })
}

#[cfg(target_os = "macos")]
impl TryFrom<&CFDictionary> for Space {
    type Error = DescriptorError;

    fn try_from(value: &CFDictionary) -> Result<Self, Self::Error> {
        let kind = match required_i64(value, TYPE_KEY) {
            Ok(kind) => SpaceKind::from(kind),
            Err(DescriptorError::MissingKey(_)) => SpaceKind::User,
            Err(error) => return Err(error),
        };

        Ok(Self {
            id: required_i64(value, ID64_KEY)?,
            managed_space_id: required_i64(value, MANAGED_SPACE_ID_KEY)?,
            uuid: optional_value::<CFString>(value, UUID_KEY, "a string")?
                .map(|s| s.to_string())
                .unwrap_or_default(),
            kind,
        })
    }
}

#[cfg(target_os = "macos")]
impl TryFrom<&CFDictionary> for ManagedDisplay {
    type Error = DescriptorError;

    fn try_from(value: &CFDictionary) -> Result<Self, Self::Error> {
        let identifier =
            required_value::<CFString>(value, DISPLAY_IDENTIFIER_KEY, "a string")?.to_string();

        let current_space =
            match optional_value::<CFDictionary>(value, CURRENT_SPACE_KEY, "a dictionary")? {
                Some(dict) => Some(Space::try_from(dict)?),
                None => None,
            };

        let mut spaces = vec![];
        if let Some(array) = optional_value::<CFArray>(value, SPACES_KEY, "an array")? {
            for item in cf_array_as::<CFType>(array) {
                let dict = unsafe { item.as_ref() }
                    .downcast_ref::<CFDictionary>()
                    .ok_or(DescriptorError::WrongType {
                        key: SPACES_KEY,
                        expected: "an array of dictionaries",
                    })?;

                spaces.push(Space::try_from(dict)?);
            }
        }

        Ok(Self {
            identifier,
            current_space,
            spaces,
        })
    }
}

#[cfg(target_os = "macos")]
impl TryFrom<&CFArray> for DisplaySpaces {
    type Error = DescriptorError;

    fn try_from(value: &CFArray) -> Result<Self, Self::Error> {
        let mut displays = vec![];
        for item in cf_array_as::<CFType>(value) {
            let dict = unsafe { item.as_ref() }
                .downcast_ref::<CFDictionary>()
                .ok_or(DescriptorError::NotADisplay)?;

            displays.push(ManagedDisplay::try_from(dict)?);
        }

        Ok(Self(displays))
    }
}


#[cfg(all(test, target_os = "macos"))]
mod core_foundation_tests {
    use super::*;
    use crate::cf_dictionary_from_pairs;
    use objc2_core_foundation::CFRetained;

    fn number(value: i64) -> CFRetained<CFNumber> {
        CFNumber::new_i64(value)
    }

    fn array(values: &[&CFType]) -> CFRetained<CFArray> {
        let array = CFArray::<CFType>::from_objects(values);
        unsafe { CFRetained::cast_unchecked(array) }
    }

    fn space(id: i64, kind: i64, uuid: &str) -> CFRetained<CFDictionary> {
        let id = number(id);
        let kind = number(kind);
        let uuid = CFString::from_str(uuid);

        cf_dictionary_from_pairs(&[
            (ID64_KEY, &id),
            (MANAGED_SPACE_ID_KEY, &id),
            (TYPE_KEY, &kind),
            (UUID_KEY, &uuid),
        ])
    }

    #[test]
    fn test_parse_display_spaces() {
        let main = CFString::from_static_str("Main");
        let first = space(1, 0, "");
        let second = space(5, 4, "1D2C3B4A-0000-4000-8000-000000000005");
        let spaces = array(&[&first, &second]);

        let display = cf_dictionary_from_pairs(&[
            (DISPLAY_IDENTIFIER_KEY, &main),
            (CURRENT_SPACE_KEY, &first),
            (SPACES_KEY, &spaces),
        ]);
        let displays = array(&[&display]);

        let parsed = DisplaySpaces::try_from(&*displays).unwrap();
        assert_eq!(parsed.displays().len(), 1);

        let main = parsed.display("Main").unwrap();
        assert_eq!(main.current_space.as_ref().map(|space| space.id), Some(1));
        assert_eq!(main.spaces.len(), 2);
        assert_eq!(main.spaces[1].kind, SpaceKind::Fullscreen);
        assert_eq!(main.spaces[1].uuid, "1D2C3B4A-0000-4000-8000-000000000005");
    }

    #[test]
    fn test_missing_id64_is_an_error() {
        let managed = number(1);
        let descriptor = cf_dictionary_from_pairs(&[(MANAGED_SPACE_ID_KEY, &managed)]);

        assert_eq!(
            Space::try_from(&*descriptor),
            Err(DescriptorError::MissingKey(ID64_KEY))
        );
    }

    #[test]
    fn test_wrong_typed_values_are_errors() {
        let id = number(1);
        let kind = CFString::from_static_str("desktop");
        let descriptor = cf_dictionary_from_pairs(&[
            (ID64_KEY, &id),
            (MANAGED_SPACE_ID_KEY, &id),
            (TYPE_KEY, &kind),
        ]);

        assert_eq!(
            Space::try_from(&*descriptor),
            Err(DescriptorError::WrongType {
                key: TYPE_KEY,
                expected: "an integer"
            })
        );

        let not_a_number = CFString::from_static_str("1");
        let descriptor = cf_dictionary_from_pairs(&[
            (ID64_KEY, &not_a_number),
            (MANAGED_SPACE_ID_KEY, &id),
        ]);

        assert!(matches!(
            Space::try_from(&*descriptor),
            Err(DescriptorError::WrongType { key: ID64_KEY, .. })
        ));
    }

    #[test]
    fn test_missing_type_is_a_desktop() {
        let id = number(2);
        let descriptor =
            cf_dictionary_from_pairs(&[(ID64_KEY, &id), (MANAGED_SPACE_ID_KEY, &id)]);

        let space = Space::try_from(&*descriptor).unwrap();
        assert_eq!(space.kind, SpaceKind::User);
        assert!(space.uuid.is_empty());
    }

    #[test]
    fn test_non_dictionary_display_is_an_error() {
        let main = CFString::from_static_str("Main");
        let displays = array(&[&main]);

        assert_eq!(
            DisplaySpaces::try_from(&*displays),
            Err(DescriptorError::NotADisplay)
        );
    }
}
