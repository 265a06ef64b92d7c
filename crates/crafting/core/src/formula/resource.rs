//! Named resource quantities.

use std::borrow::Borrow;
use std::fmt;

use crate::error::ConstructionError;

/// Which side of a formula a list belongs to.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ListSide {
    Input,
    Output,
}

/// Name of a resource. Never empty and never whitespace-only.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct ResourceName(String);

impl ResourceName {
    /// Returns `None` for blank names.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if is_blank(&name) { None } else { Some(Self(name)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub(crate) fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ResourceName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ResourceName {
    type Error = ConstructionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ConstructionError::BlankName)
    }
}

impl From<ResourceName> for String {
    fn from(value: ResourceName) -> Self {
        value.0
    }
}

/// One `(name, quantity)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceQuantity {
    pub name: ResourceName,
    pub quantity: u32,
}

/// Ordered list of resource quantities for one side of a formula.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceList {
    entries: Vec<ResourceQuantity>,
}

impl ResourceList {
    /// Builds a list from `(name, quantity)` pairs.
    ///
    /// # Errors
    ///
    /// `BlankResourceName` for the first blank name.
    pub fn new<N, I>(side: ListSide, pairs: I) -> Result<Self, ConstructionError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, u32)>,
    {
        let entries = pairs
            .into_iter()
            .enumerate()
            .map(|(index, (name, quantity))| {
                ResourceName::new(name)
                    .map(|name| ResourceQuantity { name, quantity })
                    .ok_or(ConstructionError::BlankResourceName { side, index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    /// Builds a list from parallel name and quantity slices.
    ///
    /// # Errors
    ///
    /// - `BlankResourceName` if any name is blank
    /// - `LengthMismatch` if the slices differ in length
    pub fn from_parallel<N: AsRef<str>>(
        side: ListSide,
        names: &[N],
        quantities: &[u32],
    ) -> Result<Self, ConstructionError> {
        if let Some(index) = names.iter().position(|name| is_blank(name.as_ref())) {
            return Err(ConstructionError::BlankResourceName { side, index });
        }
        if names.len() != quantities.len() {
            return Err(ConstructionError::LengthMismatch {
                side,
                names: names.len(),
                quantities: quantities.len(),
            });
        }
        Self::new(
            side,
            names
                .iter()
                .map(|name| name.as_ref().to_owned())
                .zip(quantities.iter().copied()),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResourceQuantity> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &ResourceName> + '_ {
        self.entries.iter().map(|entry| &entry.name)
    }

    pub fn quantities(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().map(|entry| entry.quantity)
    }

    pub fn get(&self, index: usize) -> Option<&ResourceQuantity> {
        self.entries.get(index)
    }

    /// Total quantity required per distinct name, in first-seen order.
    pub fn totals(&self) -> Vec<(&ResourceName, u64)> {
        let mut totals: Vec<(&ResourceName, u64)> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            match totals.iter_mut().find(|(name, _)| *name == &entry.name) {
                Some((_, total)) => *total += u64::from(entry.quantity),
                None => totals.push((&entry.name, u64::from(entry.quantity))),
            }
        }
        totals
    }
}

impl<'a> IntoIterator for &'a ResourceList {
    type Item = &'a ResourceQuantity;
    type IntoIter = std::slice::Iter<'a, ResourceQuantity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_and_whitespace_names() {
        assert!(ResourceName::new("").is_none());
        assert!(ResourceName::new(" \t\n").is_none());
        assert_eq!(ResourceName::new("Ore").unwrap().as_str(), "Ore");

        let err = ResourceList::new(ListSide::Output, [("Iron", 1), ("  ", 2)]).unwrap_err();
        assert_eq!(
            err,
            ConstructionError::BlankResourceName {
                side: ListSide::Output,
                index: 1
            }
        );
    }

    #[test]
    fn parallel_lists_must_match_in_length() {
        let err = ResourceList::from_parallel(ListSide::Input, &["Ore", "Coal"], &[2]).unwrap_err();
        assert_eq!(
            err,
            ConstructionError::LengthMismatch {
                side: ListSide::Input,
                names: 2,
                quantities: 1
            }
        );

        let list = ResourceList::from_parallel(ListSide::Input, &["Ore", "Coal"], &[2, 1]).unwrap();
        assert_eq!(list.quantities().collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn string_conversion_rejects_blank_with_neutral_error() {
        assert_eq!(
            ResourceName::try_from(" ".to_owned()),
            Err(ConstructionError::BlankName)
        );
        let name = ResourceName::try_from("Iron".to_owned()).unwrap();
        assert_eq!(String::from(name), "Iron");
    }

    #[test]
    fn totals_merge_repeated_names() {
        let list = ResourceList::new(ListSide::Input, [("Ore", 2), ("Coal", 1), ("Ore", 3)]).unwrap();
        let totals: Vec<_> = list
            .totals()
            .into_iter()
            .map(|(name, total)| (name.as_str().to_owned(), total))
            .collect();
        assert_eq!(totals, vec![("Ore".to_owned(), 5), ("Coal".to_owned(), 1)]);
    }
}
