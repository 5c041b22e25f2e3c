//! Per-session curve cache keyed by id, with a name index pointing into it.

// self
use crate::{
	_prelude::*,
	curve::{Curve, CurveId},
};

#[derive(Default)]
struct CacheMaps {
	curves: HashMap<CurveId, Arc<Curve>>,
	names: HashMap<String, CurveId>,
}

/// Thread-safe curve cache; both maps change under one write lock so a name never points at an
/// id that is not cached.
#[derive(Default)]
pub(crate) struct CurveCache(RwLock<CacheMaps>);
impl CurveCache {
	pub(crate) fn get(&self, id: CurveId) -> Option<Arc<Curve>> {
		self.0.read().curves.get(&id).cloned()
	}

	pub(crate) fn id_for(&self, name: &str) -> Option<CurveId> {
		self.0.read().names.get(name).copied()
	}

	/// Inserts or replaces the curve under its id; last write wins.
	pub(crate) fn insert(&self, curve: Arc<Curve>) {
		let mut maps = self.0.write();
		let id = curve.id();

		if let Some(name) = curve.name() {
			maps.names.insert(name.to_owned(), id);
		}

		maps.curves.insert(id, curve);
	}

	pub(crate) fn len(&self) -> usize {
		self.0.read().curves.len()
	}
}
