use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use crate::DiacriticStore;
use crate::Filter;
use crate::Lookup;
use crate::MemoryStore;
use crate::StoreCache;
use crate::VariantSet;

/// German and Spanish records, shaped like the diacritics.io database.
pub(crate) const DIACRITICS_JSON: &str = include_str!("../tests/fixtures/diacritics.json");

pub(crate) fn memory_store() -> MemoryStore {
	MemoryStore::from_json(DIACRITICS_JSON).unwrap_or_else(|e| panic!("fixture store: {e}"))
}

/// A store that records every query it receives.
pub(crate) struct CountingStore {
	pub inner: MemoryStore,
	pub queries: RefCell<Vec<(Filter, String)>>,
}

impl CountingStore {
	pub fn new() -> Self {
		Self {
			inner: memory_store(),
			queries: RefCell::new(Vec::new()),
		}
	}

	pub fn query_count(&self) -> usize {
		self.queries.borrow().len()
	}
}

impl DiacriticStore for CountingStore {
	fn get_by_filter(&self, filter: Filter, code: &str) -> Lookup {
		self.queries.borrow_mut().push((filter, code.to_string()));
		self.inner.get_by_filter(filter, code)
	}
}

/// A cache backed by a plain map, used to check that the cache is injected
/// rather than global.
#[derive(Default)]
pub(crate) struct MapCache {
	pub entries: RefCell<HashMap<String, Arc<VariantSet>>>,
}

impl StoreCache for MapCache {
	fn get(&self, key: &str) -> Option<Arc<VariantSet>> {
		self.entries.borrow().get(key).cloned()
	}

	fn insert(&self, key: String, value: Arc<VariantSet>) {
		self.entries.borrow_mut().entry(key).or_insert(value);
	}
}
