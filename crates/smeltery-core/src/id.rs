use serde::{Deserialize, Serialize};

/// Identifies an item type in the catalog. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemTypeId(pub u32);

/// Identifies a recipe in the catalog. Ordering follows registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecipeId(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_type_id_equality() {
        let a = ItemTypeId(0);
        let b = ItemTypeId(0);
        let c = ItemTypeId(1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn ids_are_hashable() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ItemTypeId(0), "iron_ore");
        map.insert(ItemTypeId(1), "iron_ingot");
        assert_eq!(map[&ItemTypeId(0)], "iron_ore");
    }

    #[test]
    fn recipe_ids_order_by_registration() {
        assert!(RecipeId(0) < RecipeId(1));
    }
}
