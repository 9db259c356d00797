//! Editing operations on the program tree.
//!
//! Every operation is total: unknown ids and out-of-range indices leave the
//! tree untouched and are reported through the return value. Entry order is
//! kept exactly as stored, except that elementary entries always precede
//! exchangeable ones (see [`Module::normalize`]).

use crate::types::{Module, ModuleComponent, ModuleEntry, Package, Placement, Program};
use uuid::Uuid;

/// Move `items[from]` to position `to` (clamped to the end). Returns false
/// when `from` is out of range.
fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() {
        return false;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
    true
}

// ============================================================================
// Module
// ============================================================================

impl Module {
    /// Stable partition: elementary entries first, each group keeping its
    /// relative order. Idempotent.
    pub fn normalize(&mut self) {
        // sort_by_key is stable
        self.entries.sort_by_key(|e| e.placement);
    }

    /// Whether the entries already satisfy the placement ordering
    pub fn is_normalized(&self) -> bool {
        self.entries
            .windows(2)
            .all(|pair| pair[0].placement <= pair[1].placement)
    }

    pub fn entry(&self, entry_id: Uuid) -> Option<&ModuleEntry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }

    pub fn entry_mut(&mut self, entry_id: Uuid) -> Option<&mut ModuleEntry> {
        self.entries.iter_mut().find(|e| e.id == entry_id)
    }

    fn position(&self, entry_id: Uuid) -> Option<usize> {
        self.entries.iter().position(|e| e.id == entry_id)
    }

    /// Append a new entry and return its id
    pub fn add_entry(&mut self, component: ModuleComponent, placement: Placement) -> Uuid {
        let entry = ModuleEntry::new(component, placement);
        let id = entry.id;
        self.entries.push(entry);
        self.normalize();
        tracing::debug!("Added {:?} entry {} to module {}", placement, id, self.id);
        id
    }

    /// Insert an existing entry at `index` (clamped to the end)
    pub fn insert_entry(&mut self, index: usize, entry: ModuleEntry) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, entry);
        self.normalize();
    }

    pub fn remove_entry(&mut self, entry_id: Uuid) -> Option<ModuleEntry> {
        let index = self.position(entry_id)?;
        Some(self.entries.remove(index))
    }

    pub fn move_entry(&mut self, from: usize, to: usize) -> bool {
        let moved = move_item(&mut self.entries, from, to);
        if moved {
            self.normalize();
        }
        moved
    }

    pub fn set_entry_include(&mut self, entry_id: Uuid, include: bool) -> bool {
        match self.entry_mut(entry_id) {
            Some(entry) => {
                entry.include = include;
                true
            }
            None => false,
        }
    }

    pub fn set_entry_placement(&mut self, entry_id: Uuid, placement: Placement) -> bool {
        let Some(entry) = self.entry_mut(entry_id) else {
            return false;
        };
        entry.placement = placement;
        self.normalize();
        true
    }

    /// Replace an entry's component wholesale, keeping id, placement and
    /// include flag. Returns the previous component.
    pub fn exchange_component(
        &mut self,
        entry_id: Uuid,
        component: ModuleComponent,
    ) -> Option<ModuleComponent> {
        let entry = self.entry_mut(entry_id)?;
        Some(std::mem::replace(&mut entry.component, component))
    }
}

// ============================================================================
// Package
// ============================================================================

impl Package {
    pub fn add_module(&mut self, module: Module) -> Uuid {
        let id = module.id;
        self.modules.push(module);
        id
    }

    pub fn remove_module(&mut self, module_id: Uuid) -> Option<Module> {
        let index = self.modules.iter().position(|m| m.id == module_id)?;
        Some(self.modules.remove(index))
    }

    pub fn move_module(&mut self, from: usize, to: usize) -> bool {
        move_item(&mut self.modules, from, to)
    }
}

// ============================================================================
// Program
// ============================================================================

impl Program {
    pub fn add_package(&mut self, package: Package) -> Uuid {
        let id = package.id;
        tracing::debug!("Adding package '{}' ({})", package.title, id);
        self.packages.push(package);
        id
    }

    pub fn remove_package(&mut self, package_id: Uuid) -> Option<Package> {
        let index = self.packages.iter().position(|p| p.id == package_id)?;
        Some(self.packages.remove(index))
    }

    pub fn move_package(&mut self, from: usize, to: usize) -> bool {
        move_item(&mut self.packages, from, to)
    }

    pub fn package(&self, package_id: Uuid) -> Option<&Package> {
        self.packages.iter().find(|p| p.id == package_id)
    }

    pub fn package_mut(&mut self, package_id: Uuid) -> Option<&mut Package> {
        self.packages.iter_mut().find(|p| p.id == package_id)
    }

    pub fn set_package_include(&mut self, package_id: Uuid, include: bool) -> bool {
        match self.package_mut(package_id) {
            Some(package) => {
                package.include = include;
                true
            }
            None => false,
        }
    }

    /// Find a module anywhere in the program
    pub fn find_module_mut(&mut self, module_id: Uuid) -> Option<&mut Module> {
        self.packages
            .iter_mut()
            .flat_map(|p| p.modules.iter_mut())
            .find(|m| m.id == module_id)
    }

    /// Find an entry anywhere in the program
    pub fn find_entry(&self, entry_id: Uuid) -> Option<&ModuleEntry> {
        self.packages
            .iter()
            .flat_map(|p| p.modules.iter())
            .find_map(|m| m.entry(entry_id))
    }

    fn module_containing_mut(&mut self, entry_id: Uuid) -> Option<&mut Module> {
        self.packages
            .iter_mut()
            .flat_map(|p| p.modules.iter_mut())
            .find(|m| m.entry(entry_id).is_some())
    }

    pub fn set_entry_include(&mut self, entry_id: Uuid, include: bool) -> bool {
        self.module_containing_mut(entry_id)
            .map(|m| m.set_entry_include(entry_id, include))
            .unwrap_or(false)
    }

    pub fn set_entry_placement(&mut self, entry_id: Uuid, placement: Placement) -> bool {
        self.module_containing_mut(entry_id)
            .map(|m| m.set_entry_placement(entry_id, placement))
            .unwrap_or(false)
    }

    pub fn remove_entry(&mut self, entry_id: Uuid) -> Option<ModuleEntry> {
        let removed = self.module_containing_mut(entry_id)?.remove_entry(entry_id);
        if removed.is_some() {
            tracing::debug!("Removed entry {}", entry_id);
        }
        removed
    }

    pub fn exchange_component(
        &mut self,
        entry_id: Uuid,
        component: ModuleComponent,
    ) -> Option<ModuleComponent> {
        let previous = self
            .module_containing_mut(entry_id)?
            .exchange_component(entry_id, component);
        if previous.is_some() {
            tracing::debug!("Exchanged component of entry {}", entry_id);
        }
        previous
    }
}
