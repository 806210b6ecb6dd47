// component_storage.rs - packed, type-erased storage for one component type
//
// Every component type id owns exactly one ComponentStorage in the registry.
// The storage is untyped until the first insert binds it to a concrete Rust
// type; from then on it holds a contiguous run of that type in [0, len).
// Removal swaps the last element into the hole so the run stays packed.

use super::view::{CastFn, ComponentView, ComponentViewMut, DynView, DynViewMut};
use crate::ecs::{Component, ComponentId, ComponentType, Entity, EntityStorage};
use std::alloc::{self, Layout};
use std::any::TypeId;
use std::ptr::{self, NonNull};

/// Back-reference from a stored component to the entity that owns it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ComponentOwner {
    /// Slot of the owning entity in the registry's entity storage.
    pub entity: usize,
    /// Position of this component in the owner's component list.
    pub index_in_entity: u16,
}

/// Everything needed to handle elements without knowing their type.
#[derive(Debug, Copy, Clone)]
struct ElementInfo {
    rust_type: TypeId,
    id: ComponentId,
    name: &'static str,
    builtin: bool,
    layout: Layout,
    drop: unsafe fn(*mut u8),
    cast: CastFn,
}

impl ElementInfo {
    fn of<C: ComponentType>() -> Self {
        Self {
            rust_type: TypeId::of::<C>(),
            id: C::ID,
            name: C::NAME,
            builtin: C::BUILTIN,
            layout: Layout::new::<C>(),
            drop: drop_erased::<C>,
            cast: cast_erased::<C>,
        }
    }
}

unsafe fn drop_erased<C>(ptr: *mut u8) {
    ptr::drop_in_place(ptr.cast::<C>())
}

unsafe fn cast_erased<C: Component>(ptr: *mut u8) -> *mut dyn Component {
    ptr.cast::<C>() as *mut dyn Component
}

/// Growable packed array of a single component type.
///
/// Growth doubles the byte capacity and moves every live element into the
/// new buffer. Elements are referenced by slot index everywhere else, so a
/// relocation needs no fix-up; only swap-remove changes a slot.
#[derive(Debug)]
pub struct ComponentStorage {
    data: NonNull<u8>,
    byte_capacity: usize,
    len: usize,
    owners: Vec<ComponentOwner>,
    info: Option<ElementInfo>,
    initial_capacity: usize,
}

// SAFETY: the buffer is uniquely owned by the storage and only ever holds
// `Component` values, which are `Send`.
unsafe impl Send for ComponentStorage {}

impl ComponentStorage {
    pub fn new() -> Self {
        Self::with_initial_capacity(1)
    }

    /// The first allocation reserves room for `elements` components.
    pub fn with_initial_capacity(elements: usize) -> Self {
        Self {
            data: NonNull::dangling(),
            byte_capacity: 0,
            len: 0,
            owners: Vec::new(),
            info: None,
            initial_capacity: elements.max(1),
        }
    }

    /// Number of live components.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn byte_capacity(&self) -> usize {
        self.byte_capacity
    }

    /// Byte distance between consecutive elements; 0 while unbound.
    #[inline]
    pub fn stride(&self) -> usize {
        self.info.map_or(0, |info| info.layout.size())
    }

    /// Component id of the bound type.
    pub fn component_id(&self) -> Option<ComponentId> {
        self.info.map(|info| info.id)
    }

    /// Name of the bound type.
    pub fn type_name(&self) -> Option<&'static str> {
        self.info.map(|info| info.name)
    }

    pub fn is_builtin(&self) -> bool {
        self.info.is_some_and(|info| info.builtin)
    }

    /// Whether this storage holds `C`. Panics if it holds another type.
    pub fn holds<C: ComponentType>(&self) -> bool {
        match self.info {
            Some(info) => {
                assert!(
                    info.rust_type == TypeId::of::<C>(),
                    "component id {} is shared by `{}` and `{}`",
                    C::ID,
                    info.name,
                    C::NAME
                );
                true
            }
            None => false,
        }
    }

    fn bind<C: ComponentType>(&mut self) -> ElementInfo {
        if self.holds::<C>() {
            if let Some(info) = self.info {
                return info;
            }
        }
        let info = ElementInfo::of::<C>();
        if info.layout.size() == 0 {
            self.data = aligned_dangling(info.layout.align());
        }
        self.info = Some(info);
        info
    }

    #[inline]
    fn slot_ptr(&self, index: usize) -> *mut u8 {
        unsafe {
            // SAFETY: callers pass indices within the allocated capacity, so
            // the offset stays inside the buffer (or is zero for ZSTs).
            self.data.as_ptr().add(index * self.stride())
        }
    }

    // Make room for one more element, doubling the buffer when full.
    fn reserve_one(&mut self, info: ElementInfo) {
        let size = info.layout.size();
        if size == 0 {
            return;
        }

        let required = (self.len + 1)
            .checked_mul(size)
            .expect("component storage size overflow");
        if required <= self.byte_capacity {
            return;
        }

        let new_capacity = if self.byte_capacity == 0 {
            size.checked_mul(self.initial_capacity)
        } else {
            self.byte_capacity.checked_mul(2)
        }
        .expect("component storage size overflow");
        let new_layout = Layout::from_size_align(new_capacity, info.layout.align())
            .expect("component storage capacity overflow");

        let raw = unsafe {
            if self.byte_capacity == 0 {
                alloc::alloc(new_layout)
            } else {
                // SAFETY: `data` was allocated with this size and alignment.
                // realloc moves the live elements bitwise, which is exactly a
                // Rust move, and frees the old block.
                let old_layout =
                    Layout::from_size_align_unchecked(self.byte_capacity, info.layout.align());
                alloc::realloc(self.data.as_ptr(), old_layout, new_capacity)
            }
        };
        self.data = NonNull::new(raw).unwrap_or_else(|| alloc::handle_alloc_error(new_layout));

        tracing::debug!(
            component = info.name,
            from = self.byte_capacity,
            to = new_capacity,
            "component storage grew"
        );
        self.byte_capacity = new_capacity;
    }

    /// Append `value`, recording `owner` as its back-reference.
    ///
    /// Binds the storage to `C` on first use. Returns the new slot.
    pub fn new_instance<C: ComponentType>(
        &mut self,
        value: C,
        owner: ComponentOwner,
    ) -> (usize, &mut C) {
        let info = self.bind::<C>();
        self.reserve_one(info);

        let index = self.len;
        let slot = self.slot_ptr(index).cast::<C>();
        unsafe {
            // SAFETY: reserve_one guaranteed capacity for `index`, which is
            // past the live range, so nothing is overwritten.
            ptr::write(slot, value);
        }
        self.owners.push(owner);
        self.len += 1;

        (index, unsafe { &mut *slot })
    }

    /// Swap-remove the component at `index` and drop it.
    ///
    /// The last element moves into `index`; its owner's reference is
    /// rewritten through `entities`. Returns the removed component's owner so
    /// the caller can prune that entity's list.
    pub fn remove_instance(
        &mut self,
        entities: &mut EntityStorage<Entity>,
        index: usize,
    ) -> ComponentOwner {
        debug_assert!(
            index < self.len,
            "component slot {index} out of range (len {})",
            self.len
        );
        let removed = self.owners[index];
        let info = match self.info {
            Some(info) => info,
            None => unreachable!("a non-empty storage is always bound"),
        };

        let last = self.len - 1;
        if index != last {
            let moved = self.owners[last];
            if let Some(entity) = entities.get_mut(removed.entity) {
                entity.relocate_component(removed.index_in_entity, last);
            }
            if let Some(entity) = entities.get_mut(moved.entity) {
                entity.relocate_component(moved.index_in_entity, index);
            }
            unsafe {
                // SAFETY: both slots are live and distinct.
                ptr::swap_nonoverlapping(self.slot_ptr(index), self.slot_ptr(last), info.layout.size());
            }
            self.owners.swap(index, last);
        }

        self.owners.pop();
        self.len = last;
        unsafe {
            // SAFETY: `last` held a live element and is no longer counted.
            (info.drop)(self.slot_ptr(last));
        }
        removed
    }

    pub fn get<C: ComponentType>(&self, index: usize) -> Option<&C> {
        self.get_ptr::<C>(index).map(|ptr| unsafe { &*ptr.as_ptr() })
    }

    pub fn get_mut<C: ComponentType>(&mut self, index: usize) -> Option<&mut C> {
        self.get_ptr::<C>(index).map(|ptr| unsafe { &mut *ptr.as_ptr() })
    }

    /// Raw pointer to a live element, for join iteration over several
    /// storages at once.
    pub(crate) fn get_ptr<C: ComponentType>(&self, index: usize) -> Option<NonNull<C>> {
        if index >= self.len || !self.holds::<C>() {
            return None;
        }
        NonNull::new(self.slot_ptr(index).cast::<C>())
    }

    /// Base-type access to any element.
    pub fn get_dyn(&self, index: usize) -> Option<&dyn Component> {
        let info = self.info?;
        if index >= self.len {
            return None;
        }
        Some(unsafe { &*(info.cast)(self.slot_ptr(index)) })
    }

    pub fn get_dyn_mut(&mut self, index: usize) -> Option<&mut dyn Component> {
        let info = self.info?;
        if index >= self.len {
            return None;
        }
        Some(unsafe { &mut *(info.cast)(self.slot_ptr(index)) })
    }

    pub fn owner(&self, index: usize) -> Option<ComponentOwner> {
        self.owners.get(index).copied()
    }

    pub(crate) fn owner_mut(&mut self, index: usize) -> Option<&mut ComponentOwner> {
        self.owners.get_mut(index)
    }

    pub fn owners(&self) -> &[ComponentOwner] {
        &self.owners
    }

    /// Typed view of all live elements. Empty if nothing was ever stored.
    pub fn view<C: ComponentType>(&self) -> ComponentView<'_, C> {
        if self.is_empty() || !self.holds::<C>() {
            return ComponentView::new(&[], &[]);
        }
        let components = unsafe {
            // SAFETY: [0, len) holds initialized `C` values and the buffer is
            // allocated with C's alignment.
            std::slice::from_raw_parts(self.data.as_ptr().cast::<C>(), self.len)
        };
        ComponentView::new(components, &self.owners)
    }

    pub fn view_mut<C: ComponentType>(&mut self) -> ComponentViewMut<'_, C> {
        if self.is_empty() || !self.holds::<C>() {
            return ComponentViewMut::new(&mut [], &[]);
        }
        let components = unsafe {
            // SAFETY: as in `view`, and `&mut self` makes the borrow unique.
            std::slice::from_raw_parts_mut(self.data.as_ptr().cast::<C>(), self.len)
        };
        ComponentViewMut::new(components, &self.owners)
    }

    /// Stride-based view yielding `&dyn Component`.
    pub fn dyn_view(&self) -> DynView<'_> {
        DynView::new(self.data, self.stride(), self.len, self.info.map(|info| info.cast))
    }

    pub fn dyn_view_mut(&mut self) -> DynViewMut<'_> {
        DynViewMut::new(self.data, self.stride(), self.len, self.info.map(|info| info.cast))
    }

    /// Visit every live element with its owner, in slot order.
    pub fn for_each_dyn_mut(&mut self, mut f: impl FnMut(ComponentOwner, &mut dyn Component)) {
        let Some(info) = self.info else {
            return;
        };
        for index in 0..self.len {
            let owner = self.owners[index];
            let component = unsafe { &mut *(info.cast)(self.slot_ptr(index)) };
            f(owner, component);
        }
    }
}

impl Default for ComponentStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ComponentStorage {
    fn drop(&mut self) {
        let Some(info) = self.info else {
            return;
        };
        let len = self.len;
        self.len = 0;
        for index in 0..len {
            unsafe {
                // SAFETY: [0, len) was live; len is reset first so a panicking
                // destructor cannot cause a double drop.
                (info.drop)(self.slot_ptr(index));
            }
        }
        if self.byte_capacity > 0 {
            unsafe {
                // SAFETY: allocated in reserve_one with this layout.
                let layout =
                    Layout::from_size_align_unchecked(self.byte_capacity, info.layout.align());
                alloc::dealloc(self.data.as_ptr(), layout);
            }
        }
    }
}

fn aligned_dangling(align: usize) -> NonNull<u8> {
    NonNull::new(ptr::null_mut::<u8>().wrapping_add(align)).unwrap_or(NonNull::dangling())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{ComponentRef, EntityId};
    use crate::math::Pose;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, PartialEq)]
    struct Health(u32);
    impl Component for Health {}
    crate::define_component!(Health, 3, "Health");

    struct Tag;
    impl Component for Tag {}
    crate::define_component!(Tag, 4, "Tag");

    #[repr(align(64))]
    struct Wide([u8; 64]);
    impl Component for Wide {}
    crate::define_component!(Wide, 5, "Wide");

    struct Impostor(u64);
    impl Component for Impostor {}
    crate::define_component!(Impostor, 3, "Impostor");

    struct Counted(Arc<AtomicUsize>);
    impl Component for Counted {}
    impl Drop for Counted {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
    crate::define_component!(Counted, 6, "Counted");

    /// Attach `value` to a fresh entity the way the registry does.
    fn attach<C: ComponentType>(
        storage: &mut ComponentStorage,
        entities: &mut EntityStorage<Entity>,
        value: C,
    ) -> usize {
        let (entity, entity_slot) =
            entities.add(Entity::new(EntityId::generate(), None, Pose::IDENTITY));
        let owner = ComponentOwner {
            entity: entity_slot,
            index_in_entity: entity.components().len() as u16,
        };
        let (slot, _) = storage.new_instance(value, owner);
        entities
            .get_mut(entity_slot)
            .unwrap()
            .push_component(ComponentRef { type_id: C::ID, slot });
        entity_slot
    }

    fn assert_refs_consistent(storage: &ComponentStorage, entities: &EntityStorage<Entity>) {
        for (slot, owner) in storage.owners().iter().enumerate() {
            let entity = entities.get(owner.entity).unwrap();
            let reference = entity.components()[owner.index_in_entity as usize];
            assert_eq!(reference.slot, slot);
        }
    }

    #[test]
    fn grows_by_doubling() {
        let mut storage = ComponentStorage::new();
        let mut entities = EntityStorage::new();
        let size = std::mem::size_of::<Health>();

        attach(&mut storage, &mut entities, Health(0));
        assert_eq!(storage.byte_capacity(), size);
        attach(&mut storage, &mut entities, Health(1));
        assert_eq!(storage.byte_capacity(), 2 * size);
        attach(&mut storage, &mut entities, Health(2));
        assert_eq!(storage.byte_capacity(), 4 * size);

        for i in 3..100 {
            attach(&mut storage, &mut entities, Health(i));
        }
        assert_eq!(storage.len(), 100);
        assert_eq!(storage.byte_capacity(), 128 * size);
        let values: Vec<u32> = storage.view::<Health>().iter().map(|h| h.0).collect();
        assert_eq!(values, (0..100).collect::<Vec<_>>());
        assert_refs_consistent(&storage, &entities);
    }

    #[test]
    fn swap_remove_keeps_refs_consistent() {
        let mut storage = ComponentStorage::new();
        let mut entities = EntityStorage::new();
        for i in 0..8 {
            attach(&mut storage, &mut entities, Health(i));
        }

        let removed = storage.remove_instance(&mut entities, 2);
        assert_eq!(removed.index_in_entity, 0);
        entities.get_mut(removed.entity).unwrap().detach_component(0);

        assert_eq!(storage.len(), 7);
        assert_eq!(storage.get::<Health>(2), Some(&Health(7)));
        assert_refs_consistent(&storage, &entities);

        // Removing the last element moves nothing.
        let removed = storage.remove_instance(&mut entities, 6);
        entities.get_mut(removed.entity).unwrap().detach_component(0);
        assert_eq!(storage.len(), 6);
        assert_refs_consistent(&storage, &entities);
    }

    #[test]
    fn removing_everything_reuses_buffer() {
        let mut storage = ComponentStorage::new();
        let mut entities = EntityStorage::new();

        for _ in 0..10 {
            for i in 0..4 {
                attach(&mut storage, &mut entities, Health(i));
            }
            let capacity = storage.byte_capacity();
            while !storage.is_empty() {
                let removed = storage.remove_instance(&mut entities, 0);
                entities.remove(removed.entity);
            }
            assert_eq!(storage.len(), 0);
            assert_eq!(storage.byte_capacity(), capacity);
        }
        assert_eq!(storage.byte_capacity(), 4 * std::mem::size_of::<Health>());
    }

    #[test]
    fn zero_sized_components() {
        let mut storage = ComponentStorage::new();
        let mut entities = EntityStorage::new();
        for _ in 0..5 {
            attach(&mut storage, &mut entities, Tag);
        }
        assert_eq!(storage.len(), 5);
        assert_eq!(storage.byte_capacity(), 0);
        assert_eq!(storage.view::<Tag>().len(), 5);
        assert_eq!(storage.dyn_view().iter().count(), 5);

        storage.remove_instance(&mut entities, 1);
        assert_eq!(storage.len(), 4);
    }

    #[test]
    fn respects_alignment() {
        let mut storage = ComponentStorage::new();
        let mut entities = EntityStorage::new();
        for i in 0..9 {
            attach(&mut storage, &mut entities, Wide([i; 64]));
        }
        for (i, wide) in storage.view::<Wide>().iter().enumerate() {
            assert_eq!(wide as *const Wide as usize % 64, 0);
            assert_eq!(wide.0[0], i as u8);
        }
    }

    #[test]
    fn drops_every_live_element_once() {
        let drops = Arc::new(AtomicUsize::new(0));
        {
            let mut storage = ComponentStorage::new();
            let mut entities = EntityStorage::new();
            for _ in 0..6 {
                attach(&mut storage, &mut entities, Counted(drops.clone()));
            }
            storage.remove_instance(&mut entities, 0);
            storage.remove_instance(&mut entities, 3);
            assert_eq!(drops.load(Ordering::SeqCst), 2);
        }
        assert_eq!(drops.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn unbound_storage_is_empty() {
        let storage = ComponentStorage::new();
        assert!(storage.view::<Health>().is_empty());
        assert_eq!(storage.dyn_view().stride(), 0);
        assert_eq!(storage.dyn_view().iter().count(), 0);
        assert!(storage.get::<Health>(0).is_none());
        assert!(storage.get_dyn(0).is_none());
    }

    #[test]
    #[should_panic(expected = "shared by `Health` and `Impostor`")]
    fn rejects_second_type_for_same_id() {
        let mut storage = ComponentStorage::new();
        let mut entities = EntityStorage::new();
        attach(&mut storage, &mut entities, Health(1));
        attach(&mut storage, &mut entities, Impostor(2));
    }

    #[test]
    fn initial_capacity_is_reserved() {
        let mut storage = ComponentStorage::with_initial_capacity(16);
        let mut entities = EntityStorage::new();
        attach(&mut storage, &mut entities, Health(1));
        assert_eq!(storage.byte_capacity(), 16 * std::mem::size_of::<Health>());
    }
}
