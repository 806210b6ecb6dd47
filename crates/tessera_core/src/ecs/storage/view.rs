// view.rs - Read and write views over a component storage

use super::ComponentOwner;
use crate::ecs::Component;
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::slice;

/// Recovers a `dyn Component` pointer from an untyped element address.
pub(crate) type CastFn = unsafe fn(*mut u8) -> *mut dyn Component;

/// Typed, read-only view of one storage.
pub struct ComponentView<'a, C> {
    components: &'a [C],
    owners: &'a [ComponentOwner],
}

impl<'a, C> ComponentView<'a, C> {
    pub(crate) fn new(components: &'a [C], owners: &'a [ComponentOwner]) -> Self {
        Self { components, owners }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&'a C> {
        self.components.get(slot)
    }

    pub fn owner(&self, slot: usize) -> Option<ComponentOwner> {
        self.owners.get(slot).copied()
    }

    pub fn as_slice(&self) -> &'a [C] {
        self.components
    }

    pub fn iter(&self) -> slice::Iter<'a, C> {
        self.components.iter()
    }

    /// Components paired with their owner back-references.
    pub fn iter_with_owners(
        &self,
    ) -> impl ExactSizeIterator<Item = (&'a C, ComponentOwner)> + 'a {
        self.components.iter().zip(self.owners.iter().copied())
    }
}

impl<'a, C> IntoIterator for ComponentView<'a, C> {
    type Item = &'a C;
    type IntoIter = slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

impl<'a, C> IntoIterator for &ComponentView<'a, C> {
    type Item = &'a C;
    type IntoIter = slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

/// Typed, mutable view of one storage.
pub struct ComponentViewMut<'a, C> {
    components: &'a mut [C],
    owners: &'a [ComponentOwner],
}

impl<'a, C> ComponentViewMut<'a, C> {
    pub(crate) fn new(components: &'a mut [C], owners: &'a [ComponentOwner]) -> Self {
        Self { components, owners }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&C> {
        self.components.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut C> {
        self.components.get_mut(slot)
    }

    pub fn owner(&self, slot: usize) -> Option<ComponentOwner> {
        self.owners.get(slot).copied()
    }

    pub fn iter(&self) -> slice::Iter<'_, C> {
        self.components.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, C> {
        self.components.iter_mut()
    }

    pub fn iter_mut_with_owners(
        &mut self,
    ) -> impl ExactSizeIterator<Item = (&mut C, ComponentOwner)> + '_ {
        self.components.iter_mut().zip(self.owners.iter().copied())
    }
}

impl<'a, C> IntoIterator for ComponentViewMut<'a, C> {
    type Item = &'a mut C;
    type IntoIter = slice::IterMut<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter_mut()
    }
}

/// Base-type view that walks the buffer by stride.
///
/// Used where the element type is not known statically, such as the update
/// pass. An unbound storage yields a view of length 0 and stride 0.
pub struct DynView<'a> {
    base: NonNull<u8>,
    stride: usize,
    len: usize,
    cast: Option<CastFn>,
    _marker: PhantomData<&'a dyn Component>,
}

impl<'a> DynView<'a> {
    pub(crate) fn new(base: NonNull<u8>, stride: usize, len: usize, cast: Option<CastFn>) -> Self {
        Self {
            base,
            stride,
            len: if cast.is_some() { len } else { 0 },
            cast,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn get(&self, index: usize) -> Option<&'a dyn Component> {
        let cast = self.cast?;
        if index >= self.len {
            return None;
        }
        Some(unsafe { &*cast(self.base.as_ptr().add(index * self.stride)) })
    }

    pub fn iter(&self) -> DynIter<'a> {
        DynIter {
            base: self.base,
            stride: self.stride,
            index: 0,
            len: self.len,
            cast: self.cast,
            _marker: PhantomData,
        }
    }
}

impl<'a> IntoIterator for DynView<'a> {
    type Item = &'a dyn Component;
    type IntoIter = DynIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct DynIter<'a> {
    base: NonNull<u8>,
    stride: usize,
    index: usize,
    len: usize,
    cast: Option<CastFn>,
    _marker: PhantomData<&'a dyn Component>,
}

impl<'a> Iterator for DynIter<'a> {
    type Item = &'a dyn Component;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.len {
            return None;
        }
        let cast = self.cast?;
        let ptr = unsafe { self.base.as_ptr().add(self.index * self.stride) };
        self.index += 1;
        // SAFETY: index < len, so the element is live for 'a.
        Some(unsafe { &*cast(ptr) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DynIter<'_> {}

/// Mutable counterpart of [`DynView`].
pub struct DynViewMut<'a> {
    base: NonNull<u8>,
    stride: usize,
    len: usize,
    cast: Option<CastFn>,
    _marker: PhantomData<&'a mut dyn Component>,
}

impl<'a> DynViewMut<'a> {
    pub(crate) fn new(base: NonNull<u8>, stride: usize, len: usize, cast: Option<CastFn>) -> Self {
        Self {
            base,
            stride,
            len: if cast.is_some() { len } else { 0 },
            cast,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut dyn Component> {
        let cast = self.cast?;
        if index >= self.len {
            return None;
        }
        Some(unsafe { &mut *cast(self.base.as_ptr().add(index * self.stride)) })
    }

    pub fn iter_mut(&mut self) -> DynIterMut<'_> {
        DynIterMut {
            base: self.base,
            stride: self.stride,
            index: 0,
            len: self.len,
            cast: self.cast,
            _marker: PhantomData,
        }
    }
}

impl<'a> IntoIterator for DynViewMut<'a> {
    type Item = &'a mut dyn Component;
    type IntoIter = DynIterMut<'a>;

    fn into_iter(self) -> Self::IntoIter {
        DynIterMut {
            base: self.base,
            stride: self.stride,
            index: 0,
            len: self.len,
            cast: self.cast,
            _marker: PhantomData,
        }
    }
}

pub struct DynIterMut<'a> {
    base: NonNull<u8>,
    stride: usize,
    index: usize,
    len: usize,
    cast: Option<CastFn>,
    _marker: PhantomData<&'a mut dyn Component>,
}

impl<'a> Iterator for DynIterMut<'a> {
    type Item = &'a mut dyn Component;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.len {
            return None;
        }
        let cast = self.cast?;
        let ptr = unsafe { self.base.as_ptr().add(self.index * self.stride) };
        self.index += 1;
        // SAFETY: every index is yielded once, so the borrows never alias.
        Some(unsafe { &mut *cast(ptr) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DynIterMut<'_> {}

#[cfg(test)]
mod tests {
    use crate::ecs::{
        Component, ComponentOwner, ComponentRef, ComponentStorage, ComponentType, Entity, EntityId,
        EntityStorage, UpdateContext,
    };
    use crate::math::Pose;

    #[derive(Debug, PartialEq)]
    struct Speed(f32);
    impl Component for Speed {
        fn update(&mut self, ctx: &mut UpdateContext<'_>) {
            self.0 += ctx.dt();
        }
    }
    crate::define_component!(Speed, 10, "Speed");

    fn filled(values: &[f32]) -> (ComponentStorage, EntityStorage<Entity>) {
        let mut storage = ComponentStorage::new();
        let mut entities = EntityStorage::new();
        for &value in values {
            let (_, entity_slot) =
                entities.add(Entity::new(EntityId::generate(), None, Pose::IDENTITY));
            let owner = ComponentOwner { entity: entity_slot, index_in_entity: 0 };
            let (slot, _) = storage.new_instance(Speed(value), owner);
            entities
                .get_mut(entity_slot)
                .unwrap()
                .push_component(ComponentRef { type_id: Speed::ID, slot });
        }
        (storage, entities)
    }

    #[test]
    fn typed_views_follow_slot_order() {
        let (mut storage, _) = filled(&[1.0, 2.0, 3.0]);

        let view = storage.view::<Speed>();
        assert_eq!(view.len(), 3);
        assert_eq!(view.get(1), Some(&Speed(2.0)));
        assert_eq!(view.owner(2).map(|o| o.index_in_entity), Some(0));
        let sum: f32 = view.iter().map(|s| s.0).sum();
        assert_eq!(sum, 6.0);

        for speed in storage.view_mut::<Speed>() {
            speed.0 *= 10.0;
        }
        let values: Vec<f32> = (&storage.view::<Speed>()).into_iter().map(|s| s.0).collect();
        assert_eq!(values, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn dyn_view_walks_by_stride() {
        let (mut storage, _) = filled(&[0.0, 0.0, 0.0, 0.0]);
        let dyn_view = storage.dyn_view();
        assert_eq!(dyn_view.len(), 4);
        assert_eq!(dyn_view.stride(), std::mem::size_of::<Speed>());
        assert_eq!(dyn_view.iter().len(), 4);

        let mut commands = crate::ecs::CommandBuffer::new();
        for component in storage.dyn_view_mut() {
            let mut ctx = UpdateContext::new(0.0, 0.5, EntityId::NULL, &mut commands);
            component.update(&mut ctx);
        }
        assert!(storage.view::<Speed>().iter().all(|s| s.0 == 0.5));
    }

    #[test]
    fn views_reflect_swap_remove() {
        let (mut storage, mut entities) = filled(&[1.0, 2.0, 3.0]);
        storage.remove_instance(&mut entities, 0);
        let values: Vec<f32> = storage.view::<Speed>().iter().map(|s| s.0).collect();
        assert_eq!(values, vec![3.0, 2.0]);
        assert_eq!(storage.dyn_view().iter().count(), 2);
    }
}
