//! The in-memory grocery collection.
//!
//! Items are kept in insertion order and addressed through [`ItemHandle`]s
//! handed out by the store. Views returned by queries carry the handle of
//! every entry, so an edit or delete made from a filtered list always hits
//! the exact item that was shown, even when several items look identical.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::InventoryError;
use crate::models::{Category, CategoryFilter, CategoryPolicy, GroceryItem, RawItem};

/// Opaque, stable reference to one stored item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemHandle(Uuid);

impl ItemHandle {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ItemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored item together with its handle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    handle: ItemHandle,
    item: GroceryItem,
}

impl Entry {
    pub fn handle(&self) -> ItemHandle {
        self.handle
    }

    pub fn item(&self) -> &GroceryItem {
        &self.item
    }
}

/// Ordered collection of grocery items for one session.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    entries: Vec<Entry>,
    policy: CategoryPolicy,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that validates raw input with `policy`.
    pub fn with_policy(policy: CategoryPolicy) -> Self {
        Self {
            entries: Vec::new(),
            policy,
        }
    }

    /// Create a store pre-filled with already validated items.
    pub fn from_items(items: impl IntoIterator<Item = GroceryItem>) -> Self {
        let mut inventory = Self::new();
        for item in items {
            inventory.add(item);
        }
        inventory
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn items(&self) -> impl Iterator<Item = &GroceryItem> {
        self.entries.iter().map(|e| &e.item)
    }

    pub fn get(&self, handle: ItemHandle) -> Option<&GroceryItem> {
        self.entries
            .iter()
            .find(|e| e.handle == handle)
            .map(|e| &e.item)
    }

    pub fn contains(&self, handle: ItemHandle) -> bool {
        self.position(handle).is_some()
    }

    /// Append an item and return its handle.
    pub fn add(&mut self, item: GroceryItem) -> ItemHandle {
        let handle = ItemHandle::new();
        tracing::debug!(%handle, name = %item.name, "Adding item");
        self.entries.push(Entry { handle, item });
        handle
    }

    /// Validate a raw record with the store's category policy, then append it.
    pub fn add_raw(&mut self, raw: &RawItem, today: NaiveDate) -> Result<ItemHandle, InventoryError> {
        let item = raw.validate_on(today, self.policy)?;
        Ok(self.add(item))
    }

    /// Replace every field of the item behind `handle`, keeping its position.
    pub fn update(&mut self, handle: ItemHandle, item: GroceryItem) -> Result<(), InventoryError> {
        let index = self
            .position(handle)
            .ok_or(InventoryError::NotFound(handle))?;
        tracing::debug!(%handle, name = %item.name, "Updating item");
        self.entries[index].item = item;
        Ok(())
    }

    /// Validate a raw record with the store's category policy, then replace
    /// the item behind `handle` with it.
    pub fn update_raw(
        &mut self,
        handle: ItemHandle,
        raw: &RawItem,
        today: NaiveDate,
    ) -> Result<GroceryItem, InventoryError> {
        let index = self
            .position(handle)
            .ok_or(InventoryError::NotFound(handle))?;
        let item = raw.validate_on(today, self.policy)?;
        tracing::debug!(%handle, name = %item.name, "Updating item");
        self.entries[index].item = item.clone();
        Ok(item)
    }

    /// Remove the item behind `handle` and return it.
    pub fn remove(&mut self, handle: ItemHandle) -> Result<GroceryItem, InventoryError> {
        let index = self
            .position(handle)
            .ok_or(InventoryError::NotFound(handle))?;
        let entry = self.entries.remove(index);
        tracing::debug!(%handle, name = %entry.item.name, "Removed item");
        Ok(entry.item)
    }

    /// Validate every record, then append them all in order.
    ///
    /// Nothing is appended unless the whole batch validates; the first
    /// failure is reported as `BatchRejected`.
    pub fn bulk_add(
        &mut self,
        raw_items: &[RawItem],
        today: NaiveDate,
    ) -> Result<Vec<ItemHandle>, InventoryError> {
        let mut validated = Vec::with_capacity(raw_items.len());
        for (index, raw) in raw_items.iter().enumerate() {
            match raw.validate_on(today, self.policy) {
                Ok(item) => validated.push(item),
                Err(source) => {
                    tracing::warn!(index, error = %source, "Rejecting batch");
                    return Err(InventoryError::BatchRejected { index, source });
                }
            }
        }

        Ok(validated.into_iter().map(|item| self.add(item)).collect())
    }

    /// Entries matching `predicate`, in store order.
    pub fn query<P>(&self, predicate: P) -> Vec<&Entry>
    where
        P: Fn(&GroceryItem) -> bool,
    {
        self.entries.iter().filter(|e| predicate(&e.item)).collect()
    }

    /// Case-insensitive substring match on the item name. An empty term matches everything.
    pub fn filter_by_text(&self, term: &str) -> Vec<&Entry> {
        let term = term.to_lowercase();
        self.query(|item| name_contains(item, &term))
    }

    pub fn filter_by_category(&self, filter: CategoryFilter) -> Vec<&Entry> {
        self.query(|item| filter.matches(item.category))
    }

    /// Text and category filters combined, as used by the pantry list.
    pub fn search(&self, term: &str, filter: CategoryFilter) -> Vec<&Entry> {
        let term = term.to_lowercase();
        self.query(|item| name_contains(item, &term) && filter.matches(item.category))
    }

    /// `All` followed by each category present, in order of first appearance.
    pub fn distinct_categories(&self) -> Vec<CategoryFilter> {
        let mut seen: Vec<Category> = Vec::new();
        for item in self.items() {
            if !seen.contains(&item.category) {
                seen.push(item.category);
            }
        }

        std::iter::once(CategoryFilter::All)
            .chain(seen.into_iter().map(CategoryFilter::Only))
            .collect()
    }

    fn position(&self, handle: ItemHandle) -> Option<usize> {
        self.entries.iter().position(|e| e.handle == handle)
    }
}

fn name_contains(item: &GroceryItem, lowercase_term: &str) -> bool {
    item.name.to_lowercase().contains(lowercase_term)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Field, ValidationError};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(name: &str, category: Category) -> GroceryItem {
        GroceryItem::new(name, category, date(2024, 6, 10)).with_purchase_date(date(2024, 6, 1))
    }

    fn names(entries: &[&Entry]) -> Vec<String> {
        entries.iter().map(|e| e.item().name.clone()).collect()
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut inventory = Inventory::new();
        inventory.add(item("Bananas", Category::Fruits));
        inventory.add(item("Milk", Category::Dairy));
        inventory.add(item("Bread", Category::Grains));

        let names: Vec<&str> = inventory.items().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Bananas", "Milk", "Bread"]);
        assert_eq!(inventory.len(), 3);
    }

    #[test]
    fn test_update_replaces_item_in_place() {
        let mut inventory = Inventory::new();
        inventory.add(item("Bananas", Category::Fruits));
        let handle = inventory.add(item("Milk", Category::Dairy));
        inventory.add(item("Bread", Category::Grains));

        let replacement = item("Oat Milk", Category::Beverages).with_quantity("2 cartons");
        inventory.update(handle, replacement.clone()).unwrap();

        assert_eq!(inventory.get(handle), Some(&replacement));
        let names: Vec<&str> = inventory.items().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Bananas", "Oat Milk", "Bread"]);
    }

    #[test]
    fn test_remove_twice_is_not_found() {
        let mut inventory = Inventory::new();
        let handle = inventory.add(item("Milk", Category::Dairy));

        let removed = inventory.remove(handle).unwrap();
        assert_eq!(removed.name, "Milk");
        assert!(inventory.is_empty());

        assert_eq!(
            inventory.remove(handle),
            Err(InventoryError::NotFound(handle))
        );
    }

    #[test]
    fn test_update_raw_validates_before_replacing() {
        let today = date(2024, 6, 1);
        let mut inventory = Inventory::new();
        let handle = inventory.add(item("Milk", Category::Dairy));

        let bad = RawItem::new("Milk", "Dairy", "next week");
        assert!(matches!(
            inventory.update_raw(handle, &bad, today),
            Err(InventoryError::Invalid(ValidationError::InvalidDate { .. }))
        ));
        assert_eq!(inventory.get(handle), Some(&item("Milk", Category::Dairy)));

        let good = RawItem::new("Milk", "Dairy", "2024-06-12").with_quantity("2 liters");
        let updated = inventory.update_raw(handle, &good, today).unwrap();
        assert_eq!(updated.quantity.as_deref(), Some("2 liters"));
        assert_eq!(inventory.get(handle), Some(&updated));
    }

    #[test]
    fn test_update_stale_handle_is_not_found() {
        let mut inventory = Inventory::new();
        let handle = inventory.add(item("Milk", Category::Dairy));
        inventory.remove(handle).unwrap();

        assert_eq!(
            inventory.update(handle, item("Cream", Category::Dairy)),
            Err(InventoryError::NotFound(handle))
        );
    }

    #[test]
    fn test_handles_distinguish_duplicate_items() {
        let mut inventory = Inventory::new();
        let first = inventory.add(item("Eggs", Category::Dairy));
        let second = inventory.add(item("Eggs", Category::Dairy));
        inventory.add(item("Bacon", Category::Meat));

        // Delete the second of two identical entries from a filtered view
        let view = inventory.filter_by_text("eggs");
        assert_eq!(view.len(), 2);
        let target = view[1].handle();
        assert_eq!(target, second);

        inventory.remove(target).unwrap();
        assert!(inventory.contains(first));
        assert!(!inventory.contains(second));
        assert_eq!(inventory.len(), 2);
    }

    #[test]
    fn test_handles_survive_other_removals() {
        let mut inventory = Inventory::new();
        let a = inventory.add(item("Apples", Category::Fruits));
        let b = inventory.add(item("Beef", Category::Meat));
        let c = inventory.add(item("Carrots", Category::Vegetables));

        inventory.remove(a).unwrap();
        inventory.update(c, item("Baby Carrots", Category::Vegetables)).unwrap();

        assert_eq!(inventory.get(b).map(|i| i.name.as_str()), Some("Beef"));
        assert_eq!(inventory.get(c).map(|i| i.name.as_str()), Some("Baby Carrots"));
    }

    #[test]
    fn test_bulk_add_appends_in_order() {
        let mut inventory = Inventory::new();
        inventory.add(item("Milk", Category::Dairy));

        let batch = vec![
            RawItem::new("Organic Bananas", "Fruits", "2024-06-08"),
            RawItem::new("Whole Milk", "Dairy", "2024-06-10"),
            RawItem::new("Bread", "Grains", "2024-06-05"),
        ];
        let handles = inventory.bulk_add(&batch, date(2024, 6, 1)).unwrap();

        assert_eq!(handles.len(), 3);
        let names: Vec<&str> = inventory.items().map(|i| i.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Milk", "Organic Bananas", "Whole Milk", "Bread"]
        );
        assert_eq!(
            inventory.get(handles[0]).map(|i| i.purchase_date),
            Some(date(2024, 6, 1))
        );
    }

    #[test]
    fn test_bulk_add_is_all_or_nothing() {
        let mut inventory = Inventory::new();
        inventory.add(item("Milk", Category::Dairy));

        let batch = vec![
            RawItem::new("Apples", "Fruits", "2024-06-08"),
            RawItem::new("Spinach", "Vegetables", "2024-06-04"),
            RawItem::new("Mystery", "Fruits", "not-a-date"),
            RawItem::new("Salmon", "Seafood", "2024-06-03"),
            RawItem::new("Rice", "Grains", "2025-01-01"),
        ];

        let err = inventory.bulk_add(&batch, date(2024, 6, 1)).unwrap_err();
        assert!(matches!(
            err,
            InventoryError::BatchRejected {
                index: 2,
                source: ValidationError::InvalidDate {
                    field: Field::ExpirationDate,
                    ..
                }
            }
        ));
        assert!(err.to_string().contains("item 3"));
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn test_bulk_add_uses_store_policy() {
        let batch = vec![RawItem::new("Gummy Bears", "Candy", "2024-09-01")];

        let mut strict = Inventory::new();
        assert!(strict.bulk_add(&batch, date(2024, 6, 1)).is_err());

        let mut lenient = Inventory::with_policy(CategoryPolicy::Other);
        lenient.bulk_add(&batch, date(2024, 6, 1)).unwrap();
        assert_eq!(lenient.items().next().map(|i| i.category), Some(Category::Other));
    }

    #[test]
    fn test_add_raw_reports_validation_error() {
        let mut inventory = Inventory::new();
        let err = inventory
            .add_raw(&RawItem::new("", "Dairy", "2024-06-01"), date(2024, 6, 1))
            .unwrap_err();
        assert_eq!(
            err,
            InventoryError::Invalid(ValidationError::MissingField(Field::Name))
        );
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_filter_by_text() {
        let mut inventory = Inventory::new();
        inventory.add(item("Whole Milk", Category::Dairy));
        inventory.add(item("Bread", Category::Grains));
        inventory.add(item("Almond Milk", Category::Beverages));

        let view = inventory.filter_by_text("milk");
        assert_eq!(names(&view), vec!["Whole Milk", "Almond Milk"]);

        assert_eq!(inventory.filter_by_text("MILK").len(), 2);
        assert_eq!(inventory.filter_by_text("").len(), 3);
        assert!(inventory.filter_by_text("cheese").is_empty());
    }

    #[test]
    fn test_filter_by_category() {
        let mut inventory = Inventory::new();
        inventory.add(item("Whole Milk", Category::Dairy));
        inventory.add(item("Bread", Category::Grains));
        inventory.add(item("Cheddar", Category::Dairy));

        let dairy = inventory.filter_by_category(CategoryFilter::Only(Category::Dairy));
        assert_eq!(names(&dairy), vec!["Whole Milk", "Cheddar"]);
        assert_eq!(inventory.filter_by_category(CategoryFilter::All).len(), 3);
        assert!(inventory
            .filter_by_category(CategoryFilter::Only(Category::Frozen))
            .is_empty());
    }

    #[test]
    fn test_search_combines_filters() {
        let mut inventory = Inventory::new();
        inventory.add(item("Whole Milk", Category::Dairy));
        inventory.add(item("Almond Milk", Category::Beverages));
        inventory.add(item("Milk Chocolate", Category::Snacks));

        let view = inventory.search("milk", Category::Beverages.into());
        assert_eq!(names(&view), vec!["Almond Milk"]);
    }

    #[test]
    fn test_query_does_not_mutate() {
        let mut inventory = Inventory::new();
        inventory.add(item("Bananas", Category::Fruits));
        inventory.add(item("Milk", Category::Dairy));

        let view = inventory.query(|i| i.category == Category::Fruits);
        assert_eq!(view.len(), 1);
        assert_eq!(inventory.len(), 2);
    }

    #[test]
    fn test_distinct_categories() {
        let mut inventory = Inventory::new();
        assert_eq!(inventory.distinct_categories(), vec![CategoryFilter::All]);

        inventory.add(item("Milk", Category::Dairy));
        inventory.add(item("Bananas", Category::Fruits));
        inventory.add(item("Cheddar", Category::Dairy));
        inventory.add(item("Bread", Category::Grains));

        assert_eq!(
            inventory.distinct_categories(),
            vec![
                CategoryFilter::All,
                CategoryFilter::Only(Category::Dairy),
                CategoryFilter::Only(Category::Fruits),
                CategoryFilter::Only(Category::Grains),
            ]
        );
    }
}
