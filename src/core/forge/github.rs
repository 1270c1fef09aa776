//! GitHub REST API backend.

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK};
use reqwest::StatusCode;
use tracing::{debug, trace};

use super::{DeployKey, EncryptedSecret, Forge, NewDeployKey, NewRepo, SecretsPublicKey};
use crate::core::config::Settings;
use crate::error::{ForgeError, Result};

/// REST API version pinned in every request.
const API_VERSION: &str = "2022-11-28";

/// Deploy keys fetched per page when listing.
const PAGE_SIZE: u32 = 100;

/// GitHub client authenticated with the run's token.
pub struct GitHub {
    client: Client,
    api_url: String,
}

impl GitHub {
    /// Build a client for `settings.api_url` using `settings.token`.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::Client` if the token is not a valid header value
    /// or the HTTP client cannot be built.
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", settings.token.expose()))
            .map_err(|_| ForgeError::Client("token contains invalid characters".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(format!("mirrorer/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ForgeError::Client(e.to_string()))?;

        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn get(&self, path: &str) -> Result<Response> {
        self.get_url(&self.url(path))
    }

    fn get_url(&self, url: &str) -> Result<Response> {
        trace!(%url, "GET");
        Ok(self.client.get(url).send().map_err(ForgeError::from)?)
    }
}

/// Target of the `rel="next"` entry in a `Link` header, if any.
fn next_page(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    link.split(',').find_map(|entry| {
        let (target, params) = entry.split_once(';')?;
        let is_next = params
            .split(';')
            .any(|p| p.trim().eq_ignore_ascii_case(r#"rel="next""#));
        is_next.then(|| {
            target
                .trim()
                .trim_start_matches('<')
                .trim_end_matches('>')
                .to_string()
        })
    })
}

/// Response body for error reporting.
fn body(response: Response) -> String {
    response
        .text()
        .unwrap_or_else(|e| format!("<unreadable body: {}>", e))
}

impl Forge for GitHub {
    fn repo_exists(&self, owner: &str, name: &str) -> Result<bool> {
        debug!(owner, name, "looking up repository");
        let response = self.get(&format!("/repos/{}/{}", owner, name))?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(ForgeError::RepositoryLookup {
                repo: format!("{}/{}", owner, name),
                status: status.as_u16(),
                body: body(response),
            }
            .into()),
        }
    }

    fn create_repo(&self, owner: &str, repo: &NewRepo) -> Result<()> {
        debug!(owner, name = %repo.name, "creating repository");
        let response = self
            .client
            .post(self.url(&format!("/orgs/{}/repos", owner)))
            .json(repo)
            .send()
            .map_err(ForgeError::from)?;

        if response.status() != StatusCode::CREATED {
            return Err(ForgeError::RepositoryCreation {
                repo: format!("{}/{}", owner, repo.name),
                status: response.status().as_u16(),
                body: body(response),
            }
            .into());
        }

        Ok(())
    }

    fn deploy_keys(&self, owner: &str, name: &str) -> Result<Vec<DeployKey>> {
        debug!(owner, name, "listing deploy keys");
        let mut keys = Vec::new();
        let mut url = Some(self.url(&format!(
            "/repos/{}/{}/keys?per_page={}",
            owner, name, PAGE_SIZE
        )));

        while let Some(current) = url {
            let response = self.get_url(&current)?;
            match response.status() {
                StatusCode::OK => {
                    url = next_page(response.headers());
                    let page: Vec<DeployKey> = response.json().map_err(ForgeError::from)?;
                    keys.extend(page);
                }
                StatusCode::NOT_FOUND => return Ok(Vec::new()),
                status => {
                    return Err(ForgeError::DeployKey {
                        repo: format!("{}/{}", owner, name),
                        status: status.as_u16(),
                        body: body(response),
                    }
                    .into())
                }
            }
        }

        trace!(count = keys.len(), "deploy keys listed");
        Ok(keys)
    }

    fn add_deploy_key(&self, owner: &str, name: &str, key: &NewDeployKey) -> Result<()> {
        debug!(owner, name, title = %key.title, read_only = key.read_only, "adding deploy key");
        let response = self
            .client
            .post(self.url(&format!("/repos/{}/{}/keys", owner, name)))
            .json(key)
            .send()
            .map_err(ForgeError::from)?;

        if response.status() != StatusCode::CREATED {
            return Err(ForgeError::DeployKey {
                repo: format!("{}/{}", owner, name),
                status: response.status().as_u16(),
                body: body(response),
            }
            .into());
        }

        Ok(())
    }

    fn secrets_public_key(&self, repo: &str) -> Result<SecretsPublicKey> {
        debug!(repo, "fetching secrets public key");
        let response = self.get(&format!("/repos/{}/actions/secrets/public-key", repo))?;

        if response.status() != StatusCode::OK {
            return Err(ForgeError::SecretFetch {
                repo: repo.to_string(),
                status: response.status().as_u16(),
                body: body(response),
            }
            .into());
        }

        let key: SecretsPublicKey = response.json().map_err(ForgeError::from)?;
        trace!(key_id = %key.key_id, "secrets public key fetched");
        Ok(key)
    }

    fn secret_exists(&self, repo: &str, name: &str) -> Result<bool> {
        debug!(repo, name, "looking up secret");
        let response = self.get(&format!("/repos/{}/actions/secrets/{}", repo, name))?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(ForgeError::SecretFetch {
                repo: repo.to_string(),
                status: status.as_u16(),
                body: body(response),
            }
            .into()),
        }
    }

    fn put_secret(&self, repo: &str, name: &str, secret: &EncryptedSecret) -> Result<()> {
        debug!(repo, name, key_id = %secret.key_id, "publishing secret");
        let response = self
            .client
            .put(self.url(&format!("/repos/{}/actions/secrets/{}", repo, name)))
            .json(secret)
            .send()
            .map_err(ForgeError::from)?;

        match response.status() {
            StatusCode::CREATED | StatusCode::NO_CONTENT => Ok(()),
            status => Err(ForgeError::SecretPublish {
                repo: repo.to_string(),
                name: name.to_string(),
                status: status.as_u16(),
                body: body(response),
            }
            .into()),
        }
    }
}
