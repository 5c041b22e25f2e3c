//! The session orchestrator: one-time auth configuration, curve lookup and search, attribute
//! listing, and the per-session curve cache.
//!
//! A [`Session`] is a cheap handle around shared state, so clones share the same transport,
//! auth provider, and caches. Curves keep a weak back-reference to that state. Lookups hit the
//! cache first; a miss issues one request and caches whatever the response describes. Two
//! concurrent misses on the same id both reach the API, and the later write wins.

pub mod builder;
pub mod request;
pub mod search;

mod cache;

pub use builder::*;
pub use request::*;
pub use search::*;

// self
use crate::{
	_prelude::*,
	auth::{AuthProvider, OAuth},
	config::ConfigSource,
	curve::{Curve, CurveCore, CurveId, CurveMetadata, CurveType},
	error::{ConfigError, MetadataError},
	http::{ApiHttpClient, ApiResponse},
	obs::{self, Operation},
	session::cache::CurveCache,
};

/// API host used until configuration says otherwise.
pub const DEFAULT_URLBASE: &str = "https://api.wattsight.com";

/// Attribute names accepted by [`Session::get_attribute`].
pub const ATTRIBUTES: [&str; 13] = [
	"commodities",
	"categories",
	"areas",
	"stations",
	"sources",
	"scenarios",
	"units",
	"time_zones",
	"versions",
	"frequencies",
	"data_types",
	"curve_states",
	"curve_types",
];

/// Result of an attribute listing.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValues {
	/// Parsed JSON body of a 200 response.
	Values(JsonValue),
	/// The API answered 204 No Content.
	NoContent,
}

/// Client session for the curve API.
#[derive(Clone)]
pub struct Session(Arc<SessionInner>);

pub(crate) struct SessionInner {
	urlbase: RwLock<Url>,
	auth: RwLock<Option<Arc<dyn AuthProvider>>>,
	cache: CurveCache,
	http_client: Arc<dyn ApiHttpClient>,
	retry_policy: RetryPolicy,
}

impl Session {
	/// Creates an unconfigured session on the default reqwest transport.
	#[cfg(feature = "reqwest")]
	pub fn new() -> Result<Self> {
		Self::builder().build()
	}

	/// Creates an unconfigured session on a caller-supplied transport.
	pub fn with_http_client(http_client: impl ApiHttpClient) -> Self {
		Self::from_parts(Arc::new(http_client), RetryPolicy::default())
	}

	/// Starts a [`SessionBuilder`].
	pub fn builder() -> SessionBuilder {
		SessionBuilder::default()
	}

	pub(crate) fn from_parts(http_client: Arc<dyn ApiHttpClient>, retry_policy: RetryPolicy) -> Self {
		// The default host is a valid literal, so parsing cannot fail.
		let urlbase = Url::parse(DEFAULT_URLBASE).unwrap_or_else(|_| unreachable!());

		Self(Arc::new(SessionInner {
			urlbase: RwLock::new(urlbase),
			auth: RwLock::new(None),
			cache: CurveCache::default(),
			http_client,
			retry_policy,
		}))
	}

	pub(crate) fn from_inner(inner: Arc<SessionInner>) -> Self {
		Self(inner)
	}

	/// Base URL all API paths are resolved against.
	pub fn urlbase(&self) -> Url {
		self.0.urlbase.read().clone()
	}

	/// Replaces the base URL.
	pub fn set_urlbase(&self, urlbase: &str) -> Result<()> {
		let parsed = Url::parse(urlbase).map_err(|e| ConfigError::invalid_url(urlbase, e))?;

		*self.0.urlbase.write() = parsed;

		Ok(())
	}

	/// Retry policy applied by [`data_request`](Self::data_request).
	pub fn retry_policy(&self) -> RetryPolicy {
		self.0.retry_policy
	}

	/// Whether an auth provider has been installed.
	pub fn is_configured(&self) -> bool {
		self.0.auth.read().is_some()
	}

	/// The installed auth provider, if any.
	pub fn auth(&self) -> Option<Arc<dyn AuthProvider>> {
		self.0.auth.read().clone()
	}

	/// Applies a configuration file.
	///
	/// Fails with [`ConfigError::AlreadyConfigured`] once auth is set. The file is fully
	/// parsed and validated before the urlbase or auth are touched. A file whose `auth_type` is
	/// not `OAuth` only updates the urlbase, leaving the session configurable.
	pub fn read_config_file(&self, source: impl Into<ConfigSource>) -> Result<()> {
		let mut auth = self.0.auth.write();

		if auth.is_some() {
			return Err(ConfigError::AlreadyConfigured.into());
		}

		let config = source.into().load()?;
		let urlbase = config
			.urlbase
			.as_deref()
			.map(|raw| Url::parse(raw).map_err(|e| ConfigError::invalid_url(raw, e)))
			.transpose()?;
		let provider = config
			.oauth
			.map(|oauth| {
				OAuth::new(
					oauth.client_id,
					oauth.client_secret.expose(),
					Some(oauth.auth_urlbase.as_str()),
				)
			})
			.transpose()?;

		if let Some(urlbase) = urlbase {
			*self.0.urlbase.write() = urlbase;
		}
		if let Some(provider) = provider {
			*auth = Some(Arc::new(provider));
		}

		Ok(())
	}

	/// Configures OAuth client credentials.
	///
	/// `auth_urlbase` defaults to [`DEFAULT_AUTH_URLBASE`](crate::auth::DEFAULT_AUTH_URLBASE).
	/// Fails with [`ConfigError::AlreadyConfigured`] once auth is set.
	pub fn configure(
		&self,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		auth_urlbase: Option<&str>,
	) -> Result<()> {
		let mut auth = self.0.auth.write();

		if auth.is_some() {
			return Err(ConfigError::AlreadyConfigured.into());
		}

		*auth = Some(Arc::new(OAuth::new(client_id, client_secret, auth_urlbase)?));

		Ok(())
	}

	/// Installs a custom auth provider, with the same write-once rule as
	/// [`configure`](Self::configure).
	pub fn configure_with(&self, provider: Arc<dyn AuthProvider>) -> Result<()> {
		let mut auth = self.0.auth.write();

		if auth.is_some() {
			return Err(ConfigError::AlreadyConfigured.into());
		}

		*auth = Some(provider);

		Ok(())
	}

	/// Looks a curve up by id or name, serving cached curves without a network call.
	///
	/// A name already seen by this session resolves to its cached id. Otherwise the API is
	/// asked by id when one was given, else by name.
	pub fn get_curve(&self, id: Option<CurveId>, name: Option<&str>) -> Result<Arc<Curve>> {
		obs::observe(Operation::GetCurve, "get_curve", || {
			let arg = match id.or_else(|| name.and_then(|name| self.0.cache.id_for(name))) {
				Some(id) => {
					if let Some(curve) = self.0.cache.get(id) {
						return Ok(curve);
					}

					("id", id.to_string())
				},
				None => match name {
					Some(name) => ("name", name.to_owned()),
					None => return Err(MetadataError::NoCurveSpecified.into()),
				},
			};
			let query = url::form_urlencoded::Serializer::new(String::new())
				.append_pair(arg.0, &arg.1)
				.finish();
			let response = self.data_request(&DataRequest::get(format!("/api/curves/get?{query}")))?;

			self.handle_single_curve_response(response)
		})
	}

	/// Shorthand for [`get_curve`](Self::get_curve) by id.
	pub fn get_curve_by_id(&self, id: CurveId) -> Result<Arc<Curve>> {
		self.get_curve(Some(id), None)
	}

	/// Shorthand for [`get_curve`](Self::get_curve) by name.
	pub fn get_curve_by_name(&self, name: &str) -> Result<Arc<Curve>> {
		self.get_curve(None, Some(name))
	}

	/// Searches for curves, returning them in response order.
	///
	/// Criteria are validated before any request is sent.
	pub fn search(&self, query: &SearchQuery) -> Result<Vec<Arc<Curve>>> {
		obs::observe(Operation::Search, "search", || {
			let query = query.to_query_string()?;
			let path =
				if query.is_empty() { "/api/curves".to_owned() } else { format!("/api/curves?{query}") };
			let response = self.data_request(&DataRequest::get(path))?;

			self.handle_multi_curve_response(response)
		})
	}

	/// Builds an uncached, uninitialized curve of the given type tag.
	///
	/// The curve carries no name or metadata; prefer [`get_curve`](Self::get_curve) or
	/// [`search`](Self::search).
	pub fn make_curve(&self, id: CurveId, curve_type: &str) -> Result<Curve> {
		let curve_type = CurveType::from_tag(curve_type)?;

		Ok(curve_type.construct(CurveCore::uninitialized(id, curve_type, Arc::downgrade(&self.0))))
	}

	/// Lists the valid values of an attribute such as `areas` or `units`.
	pub fn get_attribute(&self, name: &str) -> Result<AttributeValues> {
		obs::observe(Operation::GetAttribute, "get_attribute", || {
			if !ATTRIBUTES.contains(&name) {
				return Err(MetadataError::InvalidAttribute { name: name.to_owned() }.into());
			}

			let response = self.data_request(&DataRequest::get(format!("/api/{name}")))?;

			match response.status() {
				200 => Ok(AttributeValues::Values(response.json()?)),
				204 => Ok(AttributeValues::NoContent),
				status => Err(MetadataError::RequestFailed {
					operation: format!("Loading attribute `{name}`"),
					status,
					body: response.text(),
				}
				.into()),
			}
		})
	}

	/// Validates a metadata record, builds the matching curve variant, and caches it.
	pub fn build_curve(&self, record: JsonMap<String, JsonValue>) -> Result<Arc<Curve>> {
		let metadata = CurveMetadata::from_record(record)?;
		let curve = Arc::new(Curve::from_metadata(metadata, Arc::downgrade(&self.0)));

		self.0.cache.insert(curve.clone());

		Ok(curve)
	}

	/// Cached curve for `id`, without a network call.
	pub fn cached_curve(&self, id: CurveId) -> Option<Arc<Curve>> {
		self.0.cache.get(id)
	}

	/// Cached id for `name`, without a network call.
	pub fn cached_curve_id(&self, name: &str) -> Option<CurveId> {
		self.0.cache.id_for(name)
	}

	/// Number of curves cached by this session.
	pub fn cached_curve_count(&self) -> usize {
		self.0.cache.len()
	}

	fn handle_single_curve_response(&self, response: ApiResponse) -> Result<Arc<Curve>> {
		ensure_success(&response, "Curve lookup")?;

		self.build_curve(response.json()?)
	}

	fn handle_multi_curve_response(&self, response: ApiResponse) -> Result<Vec<Arc<Curve>>> {
		ensure_success(&response, "Curve search")?;

		let records: Vec<JsonMap<String, JsonValue>> = response.json()?;

		records.into_iter().map(|record| self.build_curve(record)).collect()
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		// Each lock is released before the next is taken.
		let urlbase = self.urlbase();
		let auth = self.auth();

		f.debug_struct("Session")
			.field("urlbase", &urlbase.as_str())
			.field("auth", &auth)
			.field("cached_curves", &self.0.cache.len())
			.field("retry_policy", &self.0.retry_policy)
			.finish()
	}
}

fn ensure_success(response: &ApiResponse, operation: &str) -> Result<(), MetadataError> {
	if response.is_success() {
		Ok(())
	} else {
		Err(MetadataError::RequestFailed {
			operation: operation.to_owned(),
			status: response.status(),
			body: response.text(),
		})
	}
}
