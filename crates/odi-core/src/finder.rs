//! Main odiFinder API
//!
//! This module provides the high-level API: it combines the session-keeping
//! HTTP client with the availability engine so a caller can sign in once and
//! run checks against the live listings page.

use crate::availability::check_availability;
use crate::client::{validate_city_id, OdiClient};
use crate::error::{OdiError, Result};
use crate::types::{Credentials, MealRecord, Strategy};

/// Main finder API for getodi.com
///
/// # Example
/// ```no_run
/// use odi_core::{Credentials, MealFinder, Strategy};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let finder = MealFinder::new()?;
///     finder.login(&Credentials::new("ogrenci", "parola")).await?;
///
///     let meals = finder.check("35", &["Pizza Place"], Strategy::Button).await?;
///     println!("Found {} meals", meals.len());
///
///     Ok(())
/// }
/// ```
pub struct MealFinder {
    client: OdiClient,
}

impl MealFinder {
    /// Create a new finder with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        let client = OdiClient::new()?;
        Ok(Self { client })
    }

    /// Create a new finder with a custom client.
    ///
    /// This is useful for testing or when you need custom client configuration.
    pub fn with_client(client: OdiClient) -> Self {
        Self { client }
    }

    /// Sign in to getodi.com.
    ///
    /// # Returns
    /// * `Err(OdiError::AuthFailed)` if the username or password is empty,
    ///   or the site rejects them
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        if credentials.username.trim().is_empty() || credentials.password.is_empty() {
            return Err(OdiError::AuthFailed(
                "username and password are required".to_string(),
            ));
        }

        self.client.login(credentials).await
    }

    /// Fetch the listings page for a city and report claimable meals.
    ///
    /// # Arguments
    /// * `city_id` - City plate code (1..=81)
    /// * `targets` - Restaurant names to look for
    /// * `strategy` - Availability layout to detect
    ///
    /// # Returns
    /// * `Ok(Vec<MealRecord>)` with at most one record per target
    /// * `Err(OdiError::InvalidCityId)` if the city id is not a plate code
    /// * `Err(OdiError::FetchFailed)` if the page answered with a non-success status
    /// * `Err(OdiError::ParseError)` if the page could not be parsed
    pub async fn check<S: AsRef<str>>(
        &self,
        city_id: &str,
        targets: &[S],
        strategy: Strategy,
    ) -> Result<Vec<MealRecord>> {
        let city_id = validate_city_id(city_id)?;

        let html = self.client.fetch_listings(city_id).await?;

        check_availability(&html, targets, strategy, city_id)
    }
}
