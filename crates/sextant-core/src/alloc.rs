//! Hash collections using AHash.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashset_ahash() {
        let mut set = HashSet::new();
        set.insert(42u32);
        assert!(set.contains(&42));
    }

    #[test]
    fn test_hashmap_ahash() {
        let mut map = HashMap::new();
        map.insert("axes", 1);
        assert_eq!(map.get("axes"), Some(&1));
    }
}
