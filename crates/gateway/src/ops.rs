//! The four operation hooks the protocol frontend drives.
//!
//! The frontend owns association lifecycle and APDU plumbing; it calls
//! [`SessionHandler::init`] once per association and then `search`, `fetch`
//! and `delete` as requests arrive, serially within the association. Every
//! hook reports failure as a BIB-1 [`Diagnostic`] through a uniform trap;
//! programming bugs abort the association as panics.

use tracing::{debug, info};

use z2folio_client::{Config, InventoryBackend};
use z2folio_query::{RpnNode, Translator};

use crate::error::{Diagnostic, GatewayError};
use crate::resultset::ResultSet;
use crate::session::Session;
use crate::xml::render_record;

/// Identification returned by a successful init.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitResponse {
    /// The implementation id reported to clients.
    pub implementation_id: &'static str,
    /// The implementation name reported to clients.
    pub implementation_name: &'static str,
    /// The build version reported to clients.
    pub implementation_version: &'static str,
}

impl InitResponse {
    fn current() -> Self {
        Self {
            implementation_id: "81",
            implementation_name: "z2folio gateway",
            implementation_version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// The query carried by a search request.
///
/// Frontends that already parse CQL pass it through; Type-1 queries arrive
/// as RPN trees together with the request's attribute-set OID.
#[derive(Debug, Clone)]
pub enum SearchRequest {
    /// A pre-parsed CQL query, used verbatim.
    Cql(String),
    /// A Type-1 query to translate.
    Rpn {
        /// The decoded RPN tree.
        node: RpnNode,
        /// The attribute-set OID of the search request, if it named one.
        attribute_set: Option<String>,
    },
}

/// A record delivered to the frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedRecord {
    /// The record syntax; always `"xml"`.
    pub form: &'static str,
    /// The rendered record.
    pub record: String,
}

/// The per-association dispatcher: owns the session and the back end.
///
/// `B` is the back-end seam; production frontends pass an
/// [`z2folio_client::OkapiClient`], tests an in-memory fake. Dropping the
/// handler on association teardown releases everything the association
/// owned: the token is forgotten and the result sets are discarded.
#[derive(Debug)]
pub struct SessionHandler<B: InventoryBackend> {
    backend: B,
    config: Config,
    session: Session,
}

impl<B: InventoryBackend> SessionHandler<B> {
    /// The init hook: resolves credentials, logs in, and builds the session.
    ///
    /// The frontend reloads the configuration before each call so edits take
    /// effect on the next association. Credentials carried in the init
    /// request take precedence over configured defaults; missing both fails
    /// with diagnostic 1014.
    pub async fn init(
        config: Config,
        backend: B,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<(Self, InitResponse), Diagnostic> {
        trap(Self::init_inner(config, backend, username, password).await)
    }

    async fn init_inner(
        config: Config,
        backend: B,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<(Self, InitResponse), GatewayError> {
        let username = username
            .map(str::to_string)
            .or_else(|| config.login.username.clone())
            .ok_or(GatewayError::MissingCredentials)?;
        let password = password
            .map(str::to_string)
            .or_else(|| config.login.password.clone())
            .ok_or(GatewayError::MissingCredentials)?;

        let mut session = Session::new(username, password);
        let token = backend
            .login(session.username(), session.password())
            .await
            .map_err(GatewayError::Login)?;
        session.set_token(token);
        info!(tenant = %config.okapi.tenant, username = %session.username(), "session initialized");

        let handler = Self {
            backend,
            config,
            session,
        };
        Ok((handler, InitResponse::current()))
    }

    /// The search hook: translate, create the result set, fetch the first
    /// chunk, and report the total hit count.
    pub async fn search(
        &mut self,
        setname: &str,
        request: SearchRequest,
    ) -> Result<u64, Diagnostic> {
        trap(self.search_inner(setname, request).await)
    }

    async fn search_inner(
        &mut self,
        setname: &str,
        request: SearchRequest,
    ) -> Result<u64, GatewayError> {
        let cql = match request {
            SearchRequest::Cql(cql) => cql,
            SearchRequest::Rpn {
                node,
                attribute_set,
            } => {
                let mut translator = Translator::new();
                if let Some(map) = self.config.index_map.as_ref() {
                    translator = translator.with_index_map(map);
                }
                if let Some(filter) = self.config.query_filter() {
                    translator = translator.with_query_filter(filter);
                }
                if let Some(oid) = attribute_set.as_deref() {
                    translator = translator.with_default_attribute_set(oid);
                }
                translator.translate(&node, &self.session)?
            }
        };
        debug!(set = %setname, cql = %cql, "search");

        let mut result_set = ResultSet::new(setname, &cql);
        let limit = self.config.chunk_size;
        let page = self
            .backend
            .search(self.session.token(), &cql, 0, limit)
            .await
            .map_err(GatewayError::Search)?;
        result_set.set_total(page.total_records)?;
        result_set.insert_chunk(0, page.instances);

        let total = page.total_records;
        self.session.put_result_set(result_set);
        debug!(set = %setname, total, "search complete");
        Ok(total)
    }

    /// The fetch hook: return the record at a 1-based ordinal, fetching its
    /// chunk from the back end if it is not yet materialized.
    pub async fn fetch(&mut self, setname: &str, ordinal: u64) -> Result<FetchedRecord, Diagnostic> {
        trap(self.fetch_inner(setname, ordinal).await)
    }

    async fn fetch_inner(
        &mut self,
        setname: &str,
        ordinal: u64,
    ) -> Result<FetchedRecord, GatewayError> {
        let total = self
            .session
            .result_set(setname)
            .ok_or_else(|| GatewayError::ResultSetNotFound {
                name: setname.to_string(),
            })?
            .total()
            .unwrap_or(0);
        if ordinal < 1 || ordinal > total {
            return Err(GatewayError::OrdinalOutOfRange { ordinal, total });
        }

        self.ensure_record(setname, ordinal).await?;

        let record = self
            .session
            .result_set(setname)
            .and_then(|rs| rs.record(ordinal))
            .ok_or(GatewayError::MissingRecord { ordinal })?;
        Ok(FetchedRecord {
            form: "xml",
            record: render_record(record)?,
        })
    }

    /// Materializes the chunk containing `ordinal`, issuing at most one
    /// back-end search.
    async fn ensure_record(&mut self, setname: &str, ordinal: u64) -> Result<(), GatewayError> {
        let (cql, already_present) = match self.session.result_set(setname) {
            Some(rs) => (rs.cql().to_string(), rs.contains(ordinal)),
            None => {
                return Err(GatewayError::ResultSetNotFound {
                    name: setname.to_string(),
                })
            }
        };
        if already_present {
            return Ok(());
        }

        let chunk_size = self.config.chunk_size;
        let offset = ((ordinal - 1) / chunk_size as u64) * chunk_size as u64;
        debug!(set = %setname, ordinal, offset, "fetching chunk");
        let page = self
            .backend
            .search(self.session.token(), &cql, offset, chunk_size)
            .await
            .map_err(GatewayError::Search)?;

        let result_set =
            self.session
                .result_set_mut(setname)
                .ok_or_else(|| GatewayError::ResultSetNotFound {
                    name: setname.to_string(),
                })?;
        result_set.set_total(page.total_records)?;
        result_set.insert_chunk(offset, page.instances);
        if !result_set.contains(ordinal) {
            return Err(GatewayError::MissingRecord { ordinal });
        }
        Ok(())
    }

    /// The delete hook: discard the named result set.
    pub fn delete(&mut self, setname: &str) -> Result<(), Diagnostic> {
        trap(match self.session.remove_result_set(setname) {
            Some(_) => {
                debug!(set = %setname, "result set deleted");
                Ok(())
            }
            None => Err(GatewayError::ResultSetNotFound {
                name: setname.to_string(),
            }),
        })
    }

    /// Read access to the session, for frontends that report state.
    pub fn session(&self) -> &Session {
        &self.session
    }
}

/// The uniform failure trap: every dispatched failure becomes a diagnostic.
fn trap<T>(result: Result<T, GatewayError>) -> Result<T, Diagnostic> {
    result.map_err(|err| {
        let diagnostic = err.to_diagnostic();
        debug!(code = diagnostic.code, addinfo = %diagnostic.addinfo, "operation failed");
        diagnostic
    })
}
