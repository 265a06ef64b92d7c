//! Stockpile: the resource ledger formulas draw from and deliver to.
//!
//! A stockpile maps resource names to non-negative quantities. It is built
//! from a non-empty mapping and only changes through the guarded operations
//! below. It deliberately does not implement `Clone`: there is one ledger per
//! owner and it can only be handed over by move.
//!
//! `increase` / `decrease` take *absolute* target quantities. The delta
//! operations ([`Stockpile::consume`], [`Stockpile::deposit`],
//! [`Stockpile::exchange`]) are what plan execution uses.

mod error;

pub use error::LedgerViolation;

use std::collections::BTreeMap;

use crate::error::ConstructionError;
use crate::formula::{ResourceList, ResourceName};

/// Exclusively owned resource ledger.
#[derive(Debug, PartialEq, Eq)]
pub struct Stockpile {
    resources: BTreeMap<ResourceName, u32>,
    /// Contents at construction, restored by [`Stockpile::restock`].
    baseline: BTreeMap<ResourceName, u32>,
}

/// Validated post-exchange quantities, committed in one step.
#[derive(Debug)]
pub(crate) struct Settlement {
    updated: Vec<(ResourceName, u32)>,
}

impl Stockpile {
    /// Later duplicates of a name overwrite earlier ones.
    ///
    /// # Errors
    ///
    /// - `EmptyStockpile` if no resources are supplied
    /// - `BlankStockpileName` if any name is empty or whitespace
    pub fn new<N, I>(resources: I) -> Result<Self, ConstructionError>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, u32)>,
    {
        let resources = resources
            .into_iter()
            .map(|(name, quantity)| {
                ResourceName::new(name)
                    .map(|name| (name, quantity))
                    .ok_or(ConstructionError::BlankStockpileName)
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        if resources.is_empty() {
            return Err(ConstructionError::EmptyStockpile);
        }

        Ok(Self {
            baseline: resources.clone(),
            resources,
        })
    }

    pub fn has_resource(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    /// Quantity on hand; `0` for untracked resources.
    pub fn quantity(&self, name: &str) -> u32 {
        self.resources.get(name).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Resources in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&ResourceName, u32)> + '_ {
        self.resources.iter().map(|(name, quantity)| (name, *quantity))
    }

    pub fn into_resources(self) -> BTreeMap<ResourceName, u32> {
        self.resources
    }

    /// Raises `name` to the absolute quantity `target`.
    ///
    /// Returns whether the new quantity is at least the previous one.
    ///
    /// # Errors
    ///
    /// - `UnknownResource` if `name` is not tracked
    /// - `IncreaseBelowCurrent` if `target` is below the current quantity
    pub fn increase(&mut self, name: &str, target: u32) -> Result<bool, LedgerViolation> {
        let slot = self.slot_mut(name)?;
        let previous = *slot;
        if target < previous {
            return Err(LedgerViolation::IncreaseBelowCurrent {
                name: name.to_owned(),
                current: previous,
                requested: target,
            });
        }
        *slot = target;
        tracing::trace!(resource = name, previous, target, "stockpile increased");
        Ok(target >= previous)
    }

    /// Lowers `name` to the absolute quantity `target`.
    ///
    /// Returns whether the new quantity is at least the previous one, which
    /// only holds when the quantity did not change.
    ///
    /// # Errors
    ///
    /// - `UnknownResource` if `name` is not tracked
    /// - `DecreaseAboveCurrent` if `target` exceeds the current quantity
    pub fn decrease(&mut self, name: &str, target: u32) -> Result<bool, LedgerViolation> {
        let slot = self.slot_mut(name)?;
        let previous = *slot;
        if target > previous {
            return Err(LedgerViolation::DecreaseAboveCurrent {
                name: name.to_owned(),
                current: previous,
                requested: target,
            });
        }
        *slot = target;
        tracing::trace!(resource = name, previous, target, "stockpile decreased");
        Ok(target >= previous)
    }

    /// Overwrites the quantity of a tracked resource without direction checks.
    pub fn set_quantity(&mut self, name: &str, quantity: u32) -> Result<(), LedgerViolation> {
        *self.slot_mut(name)? = quantity;
        Ok(())
    }

    /// Stops tracking `name`, returning its last quantity.
    ///
    /// # Errors
    ///
    /// - `UnknownResource` if `name` is not tracked
    /// - `WouldEmpty` if `name` is the only tracked resource
    pub fn remove_resource(&mut self, name: &str) -> Result<u32, LedgerViolation> {
        if !self.has_resource(name) {
            return Err(LedgerViolation::UnknownResource {
                name: name.to_owned(),
            });
        }
        if self.resources.len() == 1 {
            return Err(LedgerViolation::WouldEmpty);
        }
        self.resources
            .remove(name)
            .ok_or_else(|| LedgerViolation::UnknownResource {
                name: name.to_owned(),
            })
    }

    /// Restores the contents the stockpile was constructed with.
    pub fn restock(&mut self) {
        self.resources.clone_from(&self.baseline);
        tracing::debug!(resources = self.resources.len(), "stockpile restocked");
    }

    /// Adds each quantity to the matching resource, tracking new names.
    ///
    /// Either every entry is merged or none is.
    ///
    /// # Errors
    ///
    /// `Overflow` if any resulting quantity exceeds `u32::MAX`.
    pub fn merge<I>(&mut self, other: I) -> Result<(), LedgerViolation>
    where
        I: IntoIterator<Item = (ResourceName, u32)>,
    {
        let mut merged = self.resources.clone();
        for (name, quantity) in other {
            let current = merged.get(&name).copied().unwrap_or(0);
            let Some(updated) = current.checked_add(quantity) else {
                return Err(LedgerViolation::Overflow {
                    name: name.to_string(),
                });
            };
            merged.insert(name, updated);
        }
        self.resources = merged;
        Ok(())
    }

    /// Moves the named resources with a positive quantity into a new stockpile.
    ///
    /// Named resources at zero stay behind.
    ///
    /// # Errors
    ///
    /// - `UnknownResource` if a name is not tracked
    /// - `DuplicateResource` if a name is listed twice
    /// - `NothingToSplit` if no named resource has a positive quantity
    /// - `WouldEmpty` if every tracked resource would move
    pub fn split_off<S: AsRef<str>>(&mut self, names: &[S]) -> Result<Stockpile, LedgerViolation> {
        for (index, name) in names.iter().enumerate() {
            let name = name.as_ref();
            if !self.has_resource(name) {
                return Err(LedgerViolation::UnknownResource {
                    name: name.to_owned(),
                });
            }
            if names[..index].iter().any(|earlier| earlier.as_ref() == name) {
                return Err(LedgerViolation::DuplicateResource {
                    name: name.to_owned(),
                });
            }
        }

        let moving: Vec<ResourceName> = self
            .resources
            .iter()
            .filter(|(name, quantity)| {
                **quantity > 0 && names.iter().any(|n| n.as_ref() == name.as_str())
            })
            .map(|(name, _)| name.clone())
            .collect();
        if moving.is_empty() {
            return Err(LedgerViolation::NothingToSplit);
        }
        if moving.len() == self.resources.len() {
            return Err(LedgerViolation::WouldEmpty);
        }

        let mut split = BTreeMap::new();
        for name in moving {
            if let Some(quantity) = self.resources.remove(&name) {
                split.insert(name, quantity);
            }
        }
        Ok(Stockpile {
            baseline: split.clone(),
            resources: split,
        })
    }

    /// Removes `amount` of a tracked resource.
    ///
    /// # Errors
    ///
    /// - `UnknownResource` if `name` is not tracked
    /// - `Insufficient` if less than `amount` is on hand
    pub fn consume(&mut self, name: &str, amount: u32) -> Result<(), LedgerViolation> {
        let slot = self.slot_mut(name)?;
        if *slot < amount {
            return Err(LedgerViolation::Insufficient {
                name: name.to_owned(),
                available: *slot,
                required: u64::from(amount),
            });
        }
        *slot -= amount;
        tracing::trace!(resource = name, amount, "stockpile consumed");
        Ok(())
    }

    /// Adds `amount` of a resource, tracking it if it is new.
    ///
    /// # Errors
    ///
    /// `Overflow` if the quantity would exceed `u32::MAX`.
    pub fn deposit(&mut self, name: &ResourceName, amount: u32) -> Result<(), LedgerViolation> {
        let current = self.quantity(name.as_str());
        let updated = current
            .checked_add(amount)
            .ok_or_else(|| LedgerViolation::Overflow {
                name: name.to_string(),
            })?;
        self.resources.insert(name.clone(), updated);
        tracing::trace!(resource = %name, amount, "stockpile deposited");
        Ok(())
    }

    /// True if every input is tracked and on hand in the (summed) required amount.
    pub fn can_supply(&self, inputs: &ResourceList) -> bool {
        self.check_supply(inputs).is_ok()
    }

    /// Debits `inputs` and credits `outputs` as a single step.
    ///
    /// # Errors
    ///
    /// - `Insufficient` if an input is missing or short
    /// - `Overflow` if an output quantity would exceed `u32::MAX`
    pub fn exchange(
        &mut self,
        inputs: &ResourceList,
        outputs: &ResourceList,
    ) -> Result<(), LedgerViolation> {
        let settlement = self.settle(inputs, outputs)?;
        self.commit(settlement);
        Ok(())
    }

    /// Validates an exchange and computes the resulting quantities.
    pub(crate) fn settle(
        &self,
        inputs: &ResourceList,
        outputs: &ResourceList,
    ) -> Result<Settlement, LedgerViolation> {
        let mut updated: BTreeMap<ResourceName, u64> = self
            .check_supply(inputs)?
            .into_iter()
            .map(|(name, remaining)| (name.clone(), remaining))
            .collect();

        for (name, produced) in outputs.totals() {
            let base = updated
                .get(name)
                .copied()
                .unwrap_or_else(|| u64::from(self.quantity(name.as_str())));
            updated.insert(name.clone(), base + produced);
        }

        let updated = updated
            .into_iter()
            .map(|(name, quantity)| match u32::try_from(quantity) {
                Ok(quantity) => Ok((name, quantity)),
                Err(_) => Err(LedgerViolation::Overflow {
                    name: name.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Settlement { updated })
    }

    pub(crate) fn commit(&mut self, settlement: Settlement) {
        for (name, quantity) in settlement.updated {
            tracing::trace!(resource = %name, quantity, "stockpile settled");
            self.resources.insert(name, quantity);
        }
    }

    /// Remaining quantity per input name after debiting, or the first shortfall.
    fn check_supply<'l>(
        &self,
        inputs: &'l ResourceList,
    ) -> Result<Vec<(&'l ResourceName, u64)>, LedgerViolation> {
        inputs
            .totals()
            .into_iter()
            .map(|(name, required)| {
                let available = self.resources.get(name.as_str()).copied();
                match available {
                    Some(available) if u64::from(available) >= required => {
                        Ok((name, u64::from(available) - required))
                    }
                    _ => Err(LedgerViolation::Insufficient {
                        name: name.to_string(),
                        available: available.unwrap_or(0),
                        required,
                    }),
                }
            })
            .collect()
    }

    fn slot_mut(&mut self, name: &str) -> Result<&mut u32, LedgerViolation> {
        self.resources
            .get_mut(name)
            .ok_or_else(|| LedgerViolation::UnknownResource {
                name: name.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::ListSide;

    fn stockpile() -> Stockpile {
        Stockpile::new([("Ore", 10), ("Coal", 4)]).unwrap()
    }

    fn list(side: ListSide, pairs: &[(&str, u32)]) -> ResourceList {
        ResourceList::new(side, pairs.iter().copied()).unwrap()
    }

    #[test]
    fn construction_rejects_empty_and_blank() {
        assert_eq!(
            Stockpile::new(Vec::<(String, u32)>::new()),
            Err(ConstructionError::EmptyStockpile)
        );
        assert_eq!(
            Stockpile::new([("Ore", 1), (" ", 2)]),
            Err(ConstructionError::BlankStockpileName)
        );
    }

    #[test]
    fn lookups_default_to_zero_for_missing() {
        let pile = stockpile();
        assert!(pile.has_resource("Ore"));
        assert!(!pile.has_resource("Gold"));
        assert_eq!(pile.quantity("Coal"), 4);
        assert_eq!(pile.quantity("Gold"), 0);
    }

    #[test]
    fn increase_and_decrease_take_absolute_targets() {
        let mut pile = stockpile();

        assert_eq!(pile.increase("Ore", 15), Ok(true));
        assert_eq!(pile.quantity("Ore"), 15);
        assert_eq!(
            pile.increase("Ore", 3),
            Err(LedgerViolation::IncreaseBelowCurrent {
                name: "Ore".into(),
                current: 15,
                requested: 3
            })
        );

        assert_eq!(pile.decrease("Coal", 1), Ok(false));
        assert_eq!(pile.decrease("Coal", 1), Ok(true));
        assert!(matches!(
            pile.decrease("Coal", 9),
            Err(LedgerViolation::DecreaseAboveCurrent { current: 1, .. })
        ));
        assert!(matches!(
            pile.increase("Gold", 1),
            Err(LedgerViolation::UnknownResource { .. })
        ));
        assert_eq!(pile.quantity("Coal"), 1);
    }

    #[test]
    fn restock_restores_construction_contents() {
        let mut pile = stockpile();
        pile.consume("Ore", 10).unwrap();
        pile.deposit(&ResourceName::new("Iron").unwrap(), 3).unwrap();
        pile.remove_resource("Coal").unwrap();

        pile.restock();
        assert_eq!(pile, stockpile());
    }

    #[test]
    fn merge_adds_and_tracks_new_names() {
        let mut pile = stockpile();
        pile.merge([
            (ResourceName::new("Ore").unwrap(), 5),
            (ResourceName::new("Gold").unwrap(), 2),
        ])
        .unwrap();
        assert_eq!(pile.quantity("Ore"), 15);
        assert_eq!(pile.quantity("Gold"), 2);

        let overflow = pile.merge([(ResourceName::new("Ore").unwrap(), u32::MAX)]);
        assert!(matches!(overflow, Err(LedgerViolation::Overflow { .. })));
        assert_eq!(pile.quantity("Ore"), 15);
    }

    #[test]
    fn split_off_moves_positive_resources() {
        let mut pile = Stockpile::new([("Ore", 10), ("Coal", 0), ("Wood", 3)]).unwrap();

        let split = pile.split_off(&["Ore", "Coal"]).unwrap();
        assert_eq!(split.quantity("Ore"), 10);
        assert!(!split.has_resource("Coal"));
        assert!(!pile.has_resource("Ore"));
        assert!(pile.has_resource("Coal"));

        assert_eq!(pile.split_off(&["Coal"]), Err(LedgerViolation::NothingToSplit));
        assert!(matches!(
            pile.split_off(&["Wood", "Wood"]),
            Err(LedgerViolation::DuplicateResource { .. })
        ));
        assert!(matches!(
            pile.split_off(&["Gold"]),
            Err(LedgerViolation::UnknownResource { .. })
        ));
    }

    #[test]
    fn never_drops_its_last_resource() {
        let mut single = Stockpile::new([("Ore", 1)]).unwrap();
        assert_eq!(single.remove_resource("Ore"), Err(LedgerViolation::WouldEmpty));
        assert_eq!(single.split_off(&["Ore"]), Err(LedgerViolation::WouldEmpty));
        assert_eq!(single.len(), 1);
        assert_eq!(single.quantity("Ore"), 1);

        let mut pair = stockpile();
        assert_eq!(pair.remove_resource("Coal"), Ok(4));
        assert_eq!(pair.remove_resource("Ore"), Err(LedgerViolation::WouldEmpty));
        assert!(!pair.is_empty());
    }

    #[test]
    fn exchange_is_atomic() {
        let mut pile = stockpile();
        let inputs = list(ListSide::Input, &[("Ore", 6), ("Ore", 6)]);
        let outputs = list(ListSide::Output, &[("Iron", 1)]);

        assert!(!pile.can_supply(&inputs));
        assert!(matches!(
            pile.exchange(&inputs, &outputs),
            Err(LedgerViolation::Insufficient { required: 12, .. })
        ));
        assert_eq!(pile, stockpile());

        let inputs = list(ListSide::Input, &[("Ore", 2), ("Coal", 4)]);
        let outputs = list(ListSide::Output, &[("Iron", 3), ("Coal", 1)]);
        pile.exchange(&inputs, &outputs).unwrap();
        assert_eq!(pile.quantity("Ore"), 8);
        assert_eq!(pile.quantity("Coal"), 1);
        assert_eq!(pile.quantity("Iron"), 3);
    }

    #[test]
    fn exchange_rejects_overflowing_credit() {
        let mut pile = Stockpile::new([("Ore", 1), ("Iron", u32::MAX)]).unwrap();
        let inputs = list(ListSide::Input, &[("Ore", 1)]);
        let outputs = list(ListSide::Output, &[("Iron", 1)]);

        assert!(matches!(
            pile.exchange(&inputs, &outputs),
            Err(LedgerViolation::Overflow { .. })
        ));
        assert_eq!(pile.quantity("Ore"), 1);
    }
}
