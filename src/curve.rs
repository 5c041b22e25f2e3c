//! Curve variants produced by a session.
//!
//! Every curve shares a [`CurveCore`]: its id, type, validated metadata, and a weak
//! back-reference to the session that built it so variant-specific data calls can reuse that
//! session's transport and credentials. Curves built from API metadata are always fully
//! initialized; [`Session::make_curve`](crate::Session::make_curve) is the only way to obtain
//! one without metadata.

pub mod metadata;
pub mod registry;

pub use metadata::*;
pub use registry::*;

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, session::SessionInner};

/// Integer identifier assigned to a curve by the API.
pub type CurveId = u64;

macro_rules! def_curve {
	($name:ident, $variant:ident, $doc:literal) => {
		#[doc = $doc]
		#[derive(Clone)]
		pub struct $name(CurveCore);
		impl $name {
			pub(crate) fn new(core: CurveCore) -> Self {
				Self(core)
			}
		}
		impl Deref for $name {
			type Target = CurveCore;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple(stringify!($name)).field(&self.0).finish()
			}
		}
		impl From<$name> for Curve {
			fn from(curve: $name) -> Self {
				Curve::$variant(curve)
			}
		}
	};
}

def_curve! { TimeSeriesCurve, TimeSeries, "Plain time-series curve." }
def_curve! { TaggedCurve, Tagged, "Time-series curve split into tagged sub-series." }
def_curve! { InstanceCurve, Instance, "Curve made of issued instances (forecast runs)." }
def_curve! { TaggedInstanceCurve, TaggedInstance, "Instance curve whose instances are tagged." }

/// A curve of one of the four registered variants.
#[derive(Clone, Debug)]
pub enum Curve {
	/// [`CurveType::TimeSeries`].
	TimeSeries(TimeSeriesCurve),
	/// [`CurveType::Tagged`].
	Tagged(TaggedCurve),
	/// [`CurveType::Instances`].
	Instance(InstanceCurve),
	/// [`CurveType::TaggedInstances`].
	TaggedInstance(TaggedInstanceCurve),
}
impl Curve {
	pub(crate) fn from_metadata(metadata: CurveMetadata, session: Weak<SessionInner>) -> Self {
		let curve_type = metadata.curve_type();

		curve_type.construct(CurveCore {
			id: metadata.id(),
			curve_type,
			metadata: Some(metadata),
			session,
		})
	}

	/// Returns the time-series variant, if this is one.
	pub fn as_time_series(&self) -> Option<&TimeSeriesCurve> {
		match self {
			Self::TimeSeries(curve) => Some(curve),
			_ => None,
		}
	}

	/// Returns the tagged variant, if this is one.
	pub fn as_tagged(&self) -> Option<&TaggedCurve> {
		match self {
			Self::Tagged(curve) => Some(curve),
			_ => None,
		}
	}

	/// Returns the instance variant, if this is one.
	pub fn as_instance(&self) -> Option<&InstanceCurve> {
		match self {
			Self::Instance(curve) => Some(curve),
			_ => None,
		}
	}

	/// Returns the tagged-instance variant, if this is one.
	pub fn as_tagged_instance(&self) -> Option<&TaggedInstanceCurve> {
		match self {
			Self::TaggedInstance(curve) => Some(curve),
			_ => None,
		}
	}
}
impl Deref for Curve {
	type Target = CurveCore;

	fn deref(&self) -> &Self::Target {
		match self {
			Self::TimeSeries(curve) => &curve.0,
			Self::Tagged(curve) => &curve.0,
			Self::Instance(curve) => &curve.0,
			Self::TaggedInstance(curve) => &curve.0,
		}
	}
}

/// State shared by all curve variants.
#[derive(Clone)]
pub struct CurveCore {
	id: CurveId,
	curve_type: CurveType,
	metadata: Option<CurveMetadata>,
	session: Weak<SessionInner>,
}
impl CurveCore {
	pub(crate) fn uninitialized(
		id: CurveId,
		curve_type: CurveType,
		session: Weak<SessionInner>,
	) -> Self {
		Self { id, curve_type, metadata: None, session }
	}

	/// Curve id.
	pub fn id(&self) -> CurveId {
		self.id
	}

	/// Registered curve type.
	pub fn curve_type(&self) -> CurveType {
		self.curve_type
	}

	/// Curve name; `None` for uninitialized curves.
	pub fn name(&self) -> Option<&str> {
		self.metadata.as_ref().map(CurveMetadata::name)
	}

	/// Frequency tag; `None` for uninitialized curves.
	pub fn frequency(&self) -> Option<&str> {
		self.metadata.as_ref().map(CurveMetadata::frequency)
	}

	/// Time-zone tag; `None` for uninitialized curves.
	pub fn time_zone(&self) -> Option<&str> {
		self.metadata.as_ref().map(CurveMetadata::time_zone)
	}

	/// Validated metadata; `None` for uninitialized curves.
	pub fn metadata(&self) -> Option<&CurveMetadata> {
		self.metadata.as_ref()
	}

	/// Any field of the metadata record.
	pub fn attribute(&self, key: &str) -> Option<&JsonValue> {
		self.metadata.as_ref().and_then(|metadata| metadata.get(key))
	}

	/// Whether the curve was built from a metadata record.
	pub fn is_initialized(&self) -> bool {
		self.metadata.is_some()
	}

	/// The session that built this curve, while it is still alive.
	pub fn session(&self) -> Option<crate::Session> {
		self.session.upgrade().map(crate::Session::from_inner)
	}
}
impl Debug for CurveCore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CurveCore")
			.field("id", &self.id)
			.field("curve_type", &self.curve_type)
			.field("name", &self.name())
			.field("initialized", &self.is_initialized())
			.finish()
	}
}
