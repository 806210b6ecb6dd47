// query.rs - Joins over several component types
//
// A query walks the storage of its first type (the driver) and looks the
// remaining types up through each owner's component list. Only the first
// driver instance on an entity participates, so every entity appears at most
// once per pass.

use super::{ComponentId, ComponentStorage, ComponentType, Entity, EntityId, EntityStorage};
use std::marker::PhantomData;

/// A tuple of one to four component types that can be joined by owner.
pub trait Query {
    type Item<'a>;
    type ItemMut<'a>;

    /// Id of the storage that drives iteration.
    const DRIVER: ComponentId;

    fn ids() -> Vec<ComponentId>;

    fn fetch<'a>(storages: &'a [ComponentStorage], entity: &Entity) -> Option<Self::Item<'a>>;

    /// # Safety
    ///
    /// `storages` must point at the registry's storage array, exclusively
    /// borrowed for `'a`. The tuple's types must be distinct and `entity`
    /// must not be fetched twice during `'a`.
    unsafe fn fetch_mut<'a>(
        storages: *const ComponentStorage,
        entity: &Entity,
    ) -> Option<Self::ItemMut<'a>>;
}

macro_rules! impl_query {
    ($first:ident $(, $rest:ident)*) => {
        impl<$first: ComponentType $(, $rest: ComponentType)*> Query for ($first, $($rest,)*) {
            type Item<'a> = (&'a $first, $(&'a $rest,)*);
            type ItemMut<'a> = (&'a mut $first, $(&'a mut $rest,)*);

            const DRIVER: ComponentId = $first::ID;

            fn ids() -> Vec<ComponentId> {
                vec![$first::ID $(, $rest::ID)*]
            }

            fn fetch<'a>(
                storages: &'a [ComponentStorage],
                entity: &Entity,
            ) -> Option<Self::Item<'a>> {
                Some((
                    storages[$first::ID as usize].get::<$first>(entity.component_slot($first::ID)?)?,
                    $(storages[$rest::ID as usize].get::<$rest>(entity.component_slot($rest::ID)?)?,)*
                ))
            }

            unsafe fn fetch_mut<'a>(
                storages: *const ComponentStorage,
                entity: &Entity,
            ) -> Option<Self::ItemMut<'a>> {
                Some((
                    &mut *(*storages.add($first::ID as usize))
                        .get_ptr::<$first>(entity.component_slot($first::ID)?)?
                        .as_ptr(),
                    $(&mut *(*storages.add($rest::ID as usize))
                        .get_ptr::<$rest>(entity.component_slot($rest::ID)?)?
                        .as_ptr(),)*
                ))
            }
        }
    };
}

impl_query!(A);
impl_query!(A, B);
impl_query!(A, B, C);
impl_query!(A, B, C, D);

/// Read-only join, see [`Registry::query`](super::Registry::query).
pub struct QueryIter<'a, Q: Query> {
    storages: &'a [ComponentStorage],
    entities: &'a EntityStorage<Entity>,
    index: usize,
    _marker: PhantomData<fn() -> Q>,
}

impl<'a, Q: Query> QueryIter<'a, Q> {
    pub(crate) fn new(storages: &'a [ComponentStorage], entities: &'a EntityStorage<Entity>) -> Self {
        Self {
            storages,
            entities,
            index: 0,
            _marker: PhantomData,
        }
    }
}

impl<'a, Q: Query> Iterator for QueryIter<'a, Q> {
    type Item = (EntityId, Q::Item<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let driver = &self.storages[Q::DRIVER as usize];
        while self.index < driver.len() {
            let index = self.index;
            self.index += 1;

            let Some(entity) = driver.owner(index).and_then(|o| self.entities.get(o.entity)) else {
                continue;
            };
            if entity.component_slot(Q::DRIVER) != Some(index) {
                continue;
            }
            if let Some(item) = Q::fetch(self.storages, entity) {
                return Some((entity.id(), item));
            }
        }
        None
    }
}

/// Mutable join, see [`Registry::query_mut`](super::Registry::query_mut).
pub struct QueryIterMut<'a, Q: Query> {
    storages: *const ComponentStorage,
    entities: &'a EntityStorage<Entity>,
    index: usize,
    len: usize,
    _marker: PhantomData<(&'a mut ComponentStorage, fn() -> Q)>,
}

impl<'a, Q: Query> QueryIterMut<'a, Q> {
    /// Panics if a type repeats in `Q`.
    pub(crate) fn new(storages: &'a mut [ComponentStorage], entities: &'a EntityStorage<Entity>) -> Self {
        let ids = Q::ids();
        for (i, id) in ids.iter().enumerate() {
            assert!(
                (*id as usize) < storages.len(),
                "component id {id} is outside the registry"
            );
            assert!(
                !ids[..i].contains(id),
                "component id {id} appears twice in a mutable query"
            );
        }
        let len = storages[Q::DRIVER as usize].len();
        Self {
            storages: storages.as_ptr(),
            entities,
            index: 0,
            len,
            _marker: PhantomData,
        }
    }
}

impl<'a, Q: Query> Iterator for QueryIterMut<'a, Q> {
    type Item = (EntityId, Q::ItemMut<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        // SAFETY: `new` checked DRIVER is in bounds.
        let driver = unsafe { &*self.storages.add(Q::DRIVER as usize) };
        while self.index < self.len {
            let index = self.index;
            self.index += 1;

            let Some(entity) = driver.owner(index).and_then(|o| self.entities.get(o.entity)) else {
                continue;
            };
            if entity.component_slot(Q::DRIVER) != Some(index) {
                continue;
            }
            // SAFETY: the storages are exclusively borrowed for 'a, the types
            // are distinct, and each entity is yielded once.
            if let Some(item) = unsafe { Q::fetch_mut(self.storages, entity) } {
                return Some((entity.id(), item));
            }
        }
        None
    }
}
