//! Read-only SPARQL protocol client.

use crate::error::RemoteQueryError;
use crate::query::{ResultRow, ResultTable};
use oxhttp::model::Request;
use oxhttp::model::header::ACCEPT;
use sparesults::{
    QueryResultsFormat, QueryResultsParseError, QueryResultsParser, ReaderQueryResultsParserOutput,
};
use std::io;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Requests that take longer than this fail with a transport error.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = concat!("ontolab/", env!("CARGO_PKG_VERSION"));
const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";
const REDIRECTION_LIMIT: usize = 5;

/// A remote SPARQL endpoint queried with HTTP GET.
///
/// Each query is a single request and failures are never retried.
#[derive(Debug, Clone)]
pub struct RemoteEndpoint {
    url: String,
    timeout: Duration,
    user_agent: String,
}

impl RemoteEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends a `SELECT` query and decodes the JSON results into rows.
    pub fn select(&self, query: &str) -> Result<ResultTable, RemoteQueryError> {
        let mut url = Url::parse(&self.url).map_err(|source| RemoteQueryError::InvalidUrl {
            url: self.url.clone(),
            source,
        })?;
        if url.scheme() == "https" && !cfg!(any(feature = "rustls-webpki", feature = "native-tls"))
        {
            return Err(RemoteQueryError::MissingTls {
                url: self.url.clone(),
            });
        }
        url.query_pairs_mut().append_pair("query", query);

        let client = oxhttp::Client::new()
            .with_redirection_limit(REDIRECTION_LIMIT)
            .with_global_timeout(self.timeout)
            .with_user_agent(self.user_agent.as_str())
            .map_err(|e| self.transport_error(io::Error::new(io::ErrorKind::InvalidInput, e)))?;
        let request = Request::builder()
            .uri(url.as_str())
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .body(())
            .map_err(|e| self.transport_error(io::Error::new(io::ErrorKind::InvalidInput, e)))?;
        debug!(endpoint = %self.url, timeout_secs = self.timeout.as_secs(), "Sending SPARQL query");
        let response = client
            .request(request)
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .into_body()
                .to_string()
                .map_err(|e| self.transport_error(e))?;
            return Err(RemoteQueryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let output = QueryResultsParser::from_format(QueryResultsFormat::Json)
            .for_reader(response.into_body())
            .map_err(|source| self.decode_error(source))?;
        let ReaderQueryResultsParserOutput::Solutions(solutions) = output else {
            return Err(RemoteQueryError::UnexpectedBoolean {
                url: self.url.clone(),
            });
        };
        let variables = solutions.variables().to_vec();
        let mut rows = Vec::new();
        for solution in solutions {
            let solution = solution.map_err(|source| self.decode_error(source))?;
            rows.push(ResultRow::new(
                solution
                    .iter()
                    .map(|(variable, term)| (variable.clone(), term.clone())),
            ));
        }
        info!(endpoint = %self.url, rows = rows.len(), "Remote query answered");
        Ok(ResultTable { variables, rows })
    }

    fn transport_error(&self, source: io::Error) -> RemoteQueryError {
        RemoteQueryError::Transport {
            url: self.url.clone(),
            source,
        }
    }

    fn decode_error(&self, source: QueryResultsParseError) -> RemoteQueryError {
        RemoteQueryError::Decode {
            url: self.url.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let endpoint = RemoteEndpoint::new("http://mini23:7200/repositories/food");
        assert_eq!(endpoint.timeout(), Duration::from_secs(30));
        let endpoint = endpoint.with_timeout(Duration::from_secs(2));
        assert_eq!(endpoint.timeout(), Duration::from_secs(2));
        assert_eq!(endpoint.url(), "http://mini23:7200/repositories/food");
    }

    #[test]
    fn invalid_url() {
        assert!(matches!(
            RemoteEndpoint::new("not a url").select("ASK {}"),
            Err(RemoteQueryError::InvalidUrl { .. })
        ));
    }
}
